use std::ops::Add;

use rand::Rng;

use crate::error::JitterError;

/// A per-feature offset applied identically to every vertex of that feature.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplacementVector {
    pub dx: f64,
    pub dy: f64,
}

impl DisplacementVector {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[inline] pub fn new(dx: f64, dy: f64) -> Self { Self { dx, dy } }
}

impl Add for DisplacementVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { dx: self.dx + rhs.dx, dy: self.dy + rhs.dy }
    }
}

/// A validated `[min_dist, max_dist]` band for per-axis displacement magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceBand {
    min_dist: f64,
    max_dist: f64,
}

impl DistanceBand {
    /// Both bounds must be finite and non-negative, with `min_dist <= max_dist`.
    pub fn new(min_dist: f64, max_dist: f64) -> Result<Self, JitterError> {
        let valid = min_dist.is_finite() && max_dist.is_finite()
            && min_dist >= 0.0 && min_dist <= max_dist;
        if !valid {
            return Err(JitterError::InvalidRange { min_dist, max_dist });
        }
        Ok(Self { min_dist, max_dist })
    }

    #[inline] pub fn min_dist(&self) -> f64 { self.min_dist }

    #[inline] pub fn max_dist(&self) -> f64 { self.max_dist }

    /// Check if `magnitude` lies inside the band.
    #[inline]
    pub fn contains(&self, magnitude: f64) -> bool {
        (self.min_dist..=self.max_dist).contains(&magnitude)
    }

    /// Draw one displacement vector.
    ///
    /// Each axis gets its own sign (+1 or -1, equally likely) and its own
    /// magnitude drawn uniformly from the band, so the offsets fill a square
    /// annulus rather than a circular one. Call once per feature, never once
    /// per vertex.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> DisplacementVector {
        let sign_x = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sign_y = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let magnitude_x = rng.random_range(self.min_dist..=self.max_dist);
        let magnitude_y = rng.random_range(self.min_dist..=self.max_dist);
        DisplacementVector::new(magnitude_x * sign_x, magnitude_y * sign_y)
    }
}

/// Validate the band and draw one displacement vector from it.
pub fn generate_displacement<R: Rng>(
    min_dist: f64,
    max_dist: f64,
    rng: &mut R,
) -> Result<DisplacementVector, JitterError> {
    Ok(DistanceBand::new(min_dist, max_dist)?.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn band_rejects_invalid_ranges() {
        for (min, max) in [(20.0, 10.0), (-1.0, 5.0), (-5.0, -1.0), (f64::NAN, 1.0), (0.0, f64::INFINITY)] {
            let err = DistanceBand::new(min, max).unwrap_err();
            assert!(matches!(err, JitterError::InvalidRange { .. }), "({min}, {max}) accepted");
        }
    }

    #[test]
    fn band_accepts_zero_and_equal_bounds() {
        assert!(DistanceBand::new(0.0, 0.0).is_ok());
        assert!(DistanceBand::new(7.5, 7.5).is_ok());
        assert!(DistanceBand::new(0.0, 1e6).is_ok());
    }

    #[test]
    fn magnitudes_stay_in_band_and_cover_all_quadrants() {
        let mut rng = StdRng::seed_from_u64(42);
        let band = DistanceBand::new(10.0, 20.0).unwrap();
        let mut quadrants = [0usize; 4];

        for _ in 0..10_000 {
            let v = band.sample(&mut rng);
            assert!(band.contains(v.dx.abs()), "dx out of band: {}", v.dx);
            assert!(band.contains(v.dy.abs()), "dy out of band: {}", v.dy);
            let q = (v.dx > 0.0) as usize * 2 + (v.dy > 0.0) as usize;
            quadrants[q] += 1;
        }

        // each quadrant expects ~2500 draws
        for count in quadrants {
            assert!(count > 2000, "quadrant counts skewed: {quadrants:?}");
        }
    }

    #[test]
    fn axes_are_drawn_independently() {
        let mut rng = StdRng::seed_from_u64(7);
        let band = DistanceBand::new(0.0, 100.0).unwrap();
        let differing = (0..1000)
            .map(|_| band.sample(&mut rng))
            .filter(|v| v.dx.abs() != v.dy.abs())
            .count();
        assert!(differing > 990);
    }

    #[test]
    fn equal_bounds_fix_magnitude_but_not_sign() {
        let mut rng = StdRng::seed_from_u64(3);
        let band = DistanceBand::new(5.0, 5.0).unwrap();
        let mut signs = std::collections::HashSet::new();
        for _ in 0..200 {
            let v = band.sample(&mut rng);
            assert_eq!(v.dx.abs(), 5.0);
            assert_eq!(v.dy.abs(), 5.0);
            signs.insert((v.dx > 0.0, v.dy > 0.0));
        }
        assert_eq!(signs.len(), 4);
    }

    #[test]
    fn same_seed_same_vectors() {
        let band = DistanceBand::new(1500.0, 5000.0).unwrap();
        let a: Vec<_> = { let mut rng = StdRng::seed_from_u64(9); (0..16).map(|_| band.sample(&mut rng)).collect() };
        let b: Vec<_> = { let mut rng = StdRng::seed_from_u64(9); (0..16).map(|_| band.sample(&mut rng)).collect() };
        assert_eq!(a, b);
    }

    #[test]
    fn generate_displacement_validates_first() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_displacement(20.0, 10.0, &mut rng).is_err());
        let v = generate_displacement(1500.0, 5000.0, &mut rng).unwrap();
        assert!((1500.0..=5000.0).contains(&v.dx.abs()));
        assert!((1500.0..=5000.0).contains(&v.dy.abs()));
    }

    #[test]
    fn vectors_add_componentwise() {
        let v = DisplacementVector::new(1.0, -2.0) + DisplacementVector::new(0.5, 4.0);
        assert_eq!(v, DisplacementVector::new(1.5, 2.0));
    }
}
