//! Illustrative placement of asteroids on their miss-distance sphere.
//!
//! Only the radius carries meaning. Angles are random on every run.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::models::{AsteroidRecord, PlacedAsteroid, Position};

/// How the polar angle is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SphereSampling {
    /// theta and phi both uniform. Points bunch up near the poles.
    #[default]
    UniformAngles,
    /// phi = arccos(1 - 2u), uniform over the surface.
    UniformSurface,
}

impl SphereSampling {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "uniform_angles" | "angles" => Some(Self::UniformAngles),
            "uniform_surface" | "surface" => Some(Self::UniformSurface),
            _ => None,
        }
    }
}

/// Random point at distance `r` from the origin.
pub fn place_on_sphere<R: Rng + ?Sized>(r: f64, sampling: SphereSampling, rng: &mut R) -> Position {
    let theta = rng.gen_range(0.0..TAU);
    let phi = match sampling {
        SphereSampling::UniformAngles => rng.gen_range(0.0..PI),
        SphereSampling::UniformSurface => {
            let u: f64 = rng.gen();
            (1.0 - 2.0 * u).clamp(-1.0, 1.0).acos()
        }
    };

    Position {
        x: r * phi.sin() * theta.cos(),
        y: r * phi.sin() * theta.sin(),
        z: r * phi.cos(),
    }
}

/// Attach a fresh position to every record, keeping order.
pub fn place_all<R: Rng + ?Sized>(
    records: &[AsteroidRecord],
    sampling: SphereSampling,
    rng: &mut R,
) -> Vec<PlacedAsteroid> {
    records
        .iter()
        .map(|record| PlacedAsteroid {
            position: place_on_sphere(record.distance_km, sampling, rng),
            record: record.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_on_sphere(p: Position, r: f64) {
        let sq = p.x * p.x + p.y * p.y + p.z * p.z;
        let tolerance = 1e-9 * r * r;
        assert!(
            (sq - r * r).abs() <= tolerance,
            "point {:?} not on sphere of radius {}",
            p,
            r
        );
    }

    #[test]
    fn test_points_lie_on_sphere() {
        let mut rng = StdRng::seed_from_u64(7);
        for sampling in [SphereSampling::UniformAngles, SphereSampling::UniformSurface] {
            for r in [1e-3, 1.0, 42.5, 384_400.0, 7.5e7] {
                for _ in 0..200 {
                    assert_on_sphere(place_on_sphere(r, sampling, &mut rng), r);
                }
            }
        }
    }

    #[test]
    fn test_surface_sampling_covers_both_hemispheres() {
        let mut rng = StdRng::seed_from_u64(11);
        let points: Vec<Position> = (0..2000)
            .map(|_| place_on_sphere(1.0, SphereSampling::UniformSurface, &mut rng))
            .collect();

        let north = points.iter().filter(|p| p.z > 0.0).count();
        assert!(north > 800 && north < 1200, "north = {}", north);

        // Uniform on the surface means z is uniform on [-1, 1]
        let mean_z: f64 = points.iter().map(|p| p.z).sum::<f64>() / points.len() as f64;
        assert!(mean_z.abs() < 0.1, "mean z = {}", mean_z);
    }

    #[test]
    fn test_angle_sampling_clusters_at_poles() {
        let near_pole = |sampling| {
            let mut rng = StdRng::seed_from_u64(3);
            (0..5000)
                .map(|_| place_on_sphere(1.0, sampling, &mut rng))
                .filter(|p| p.z.abs() > 0.9)
                .count()
        };

        // |z| > 0.9 covers ~28.7% of phi but only 10% of the surface
        assert!(near_pole(SphereSampling::UniformAngles) > near_pole(SphereSampling::UniformSurface));
    }

    #[test]
    fn test_place_all_keeps_order_and_radius() {
        let records: Vec<AsteroidRecord> = [100_000.0, 200_000.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, &d)| AsteroidRecord {
                name: format!("A{}", i),
                distance_km: d,
                diameter: 10.0,
                diameter_min: 5.0,
                diameter_max: 15.0,
                velocity: 1000.0,
                date: "2025-10-01".to_string(),
                hazardous: false,
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(99);
        let placed = place_all(&records, SphereSampling::default(), &mut rng);

        assert_eq!(placed.len(), 3);
        for (p, r) in placed.iter().zip(&records) {
            assert_eq!(&p.record, r);
            assert_on_sphere(p.position, r.distance_km);
        }
    }

    #[test]
    fn test_parse_sampling() {
        assert_eq!(SphereSampling::parse("uniform-surface"), Some(SphereSampling::UniformSurface));
        assert_eq!(SphereSampling::parse("ANGLES"), Some(SphereSampling::UniformAngles));
        assert_eq!(SphereSampling::parse("fibonacci"), None);
    }
}
