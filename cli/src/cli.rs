use std::path::PathBuf;

/// Feature jittering CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "featurejitter", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Copy a dataset with every feature randomly displaced
    Jitter(JitterArgs),

    /// Print the driver, shape type, feature count and extent of a dataset
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct JitterArgs {
    /// Input dataset (.shp or .geojson), never modified
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output dataset, same format as the input
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Minimum displacement per axis, in dataset units (default 1500)
    #[arg(long, allow_negative_numbers = true)]
    pub min_dist: Option<f64>,

    /// Maximum displacement per axis, in dataset units (default 5000)
    #[arg(long, allow_negative_numbers = true)]
    pub max_dist: Option<f64>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON config file with min_dist, max_dist and optional seed
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Overwrite the output if it exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Dataset to describe (.shp or .geojson)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn jitter_args(argv: &[&str]) -> JitterArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Jitter(args) => args,
            other => panic!("expected jitter, got {other:?}"),
        }
    }

    #[test]
    fn negative_distances_reach_the_library() {
        let args = jitter_args(&["featurejitter", "jitter", "in.shp", "out.shp", "--min-dist", "-5", "--max-dist", "-1"]);
        assert_eq!(args.min_dist, Some(-5.0));
        assert_eq!(args.max_dist, Some(-1.0));
    }

    #[test]
    fn distances_are_optional() {
        let args = jitter_args(&["featurejitter", "-v", "jitter", "in.shp", "out.shp", "--force"]);
        assert_eq!((args.min_dist, args.max_dist), (None, None));
        assert!(args.force);
    }
}
