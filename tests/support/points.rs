#![allow(dead_code)]

use r3_voronoi::Point3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random points uniformly distributed in the unit cube.
pub fn uniform_cube_points(n: usize, seed: u64) -> Vec<Point3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point3::new(
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            )
        })
        .collect()
}

/// Tight clusters with large empty space between them.
pub fn clustered_points(clusters: usize, per_cluster: usize, seed: u64) -> Vec<Point3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(clusters * per_cluster);
    for _ in 0..clusters {
        let cx: f32 = rng.gen_range(0.1..0.9);
        let cy: f32 = rng.gen_range(0.1..0.9);
        let cz: f32 = rng.gen_range(0.1..0.9);
        for _ in 0..per_cluster {
            points.push(Point3::new(
                cx + rng.gen_range(-0.02..0.02),
                cy + rng.gen_range(-0.02..0.02),
                cz + rng.gen_range(-0.02..0.02),
            ));
        }
    }
    points
}

/// An `m x m x m` lattice with spacing `1 / (m + 1)`, one spacing away
/// from every cube face. For `m = 3` all coordinates are exact in `f32`.
pub fn lattice_points(m: usize) -> Vec<Point3> {
    let mut points = Vec::with_capacity(m * m * m);
    let step = 1.0 / (m + 1) as f32;
    for x in 1..=m {
        for y in 1..=m {
            for z in 1..=m {
                points.push(Point3::new(
                    step * x as f32,
                    step * y as f32,
                    step * z as f32,
                ));
            }
        }
    }
    points
}

/// Evenly spaced points along a line parallel to the x axis.
pub fn line_points(n: usize) -> Vec<Point3> {
    (0..n)
        .map(|i| Point3::new(0.1 + 0.8 * i as f32 / (n - 1) as f32, 0.5, 0.5))
        .collect()
}

/// Evenly spaced points along the main diagonal.
pub fn diagonal_points(n: usize) -> Vec<Point3> {
    (0..n)
        .map(|i| {
            let t = 0.1 + 0.8 * i as f32 / (n - 1) as f32;
            Point3::new(t, t, t)
        })
        .collect()
}

/// n copies of the same point.
pub fn coincident_points(n: usize) -> Vec<Point3> {
    vec![Point3::new(0.5, 0.5, 0.5); n]
}

// Fixed regression sets, kept verbatim so results stay comparable across
// refactors.

/// Ten points in general position.
pub fn standard_ten() -> Vec<Point3> {
    [
        [0.605223, 0.108484, 0.090937],
        [0.500792, 0.499641, 0.464576],
        [0.437936, 0.786332, 0.160392],
        [0.663354, 0.170894, 0.810284],
        [0.614869, 0.096867, 0.204147],
        [0.556911, 0.895342, 0.802266],
        [0.305748, 0.124146, 0.516249],
        [0.406888, 0.157835, 0.919622],
        [0.094412, 0.861991, 0.798644],
        [0.511958, 0.560537, 0.345479],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z))
    .collect()
}

/// Three tight clusters of three points each.
pub fn three_clusters() -> Vec<Point3> {
    [
        [0.1, 0.2, 0.3],
        [0.11, 0.19, 0.31],
        [0.09, 0.21, 0.29],
        [0.5, 0.5, 0.5],
        [0.51, 0.49, 0.51],
        [0.49, 0.51, 0.49],
        [0.8, 0.8, 0.8],
        [0.81, 0.79, 0.81],
        [0.79, 0.81, 0.79],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z))
    .collect()
}

/// A spherical shell sampled with the golden-angle spiral, plus poles.
pub fn fibonacci_ball() -> Vec<Point3> {
    [
        [0.500000, 0.750000, 0.500000],
        [0.408034, 0.716667, 0.584248],
        [0.514860, 0.683333, 0.330683],
        [0.621688, 0.650000, 0.658720],
        [0.282272, 0.616667, 0.461487],
        [0.698875, 0.583333, 0.373492],
        [0.436410, 0.550000, 0.736551],
        [0.385030, 0.516667, 0.278631],
        [0.734308, 0.483333, 0.585569],
        [0.273583, 0.450000, 0.593462],
        [0.599901, 0.416667, 0.286516],
        [0.566174, 0.383333, 0.710974],
        [0.326958, 0.350000, 0.399718],
        [0.666003, 0.316667, 0.463505],
        [0.428269, 0.283333, 0.602030],
        [0.500000, 0.250000, 0.500000],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z))
    .collect()
}

/// Four coplanar points on a shared z plane.
pub fn coplanar_four() -> Vec<Point3> {
    [
        [0.2, 0.2, 0.1],
        [0.3, 0.3, 0.1],
        [0.4, 0.4, 0.1],
        [0.5, 0.5, 0.1],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z))
    .collect()
}

/// A center point with four equidistant points around it.
pub fn concentric_five() -> Vec<Point3> {
    [
        [0.5, 0.5, 0.5],
        [0.55, 0.5, 0.5],
        [0.5, 0.55, 0.5],
        [0.45, 0.5, 0.5],
        [0.5, 0.45, 0.5],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z))
    .collect()
}
