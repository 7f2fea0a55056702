pub mod inspect;
pub mod jitter;
