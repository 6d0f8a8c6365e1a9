use std::path::{Path, PathBuf};

use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};
use scivis::{
    linalg::bounds::create_uninitialized_bounds,
    locator::{bounding_box, IncrementalOctreePointLocator, LocatorConfig},
};

/// Merge coincident points of a random cloud with an incremental octree
#[derive(FromArgs)]
struct Args {
    /// number of points to generate
    #[argh(option, short = 'n', default = "10000")]
    num_points: usize,

    /// fraction of the points that repeat an earlier point
    #[argh(option, short = 'r', default = "0.2")]
    repeat_ratio: f64,

    /// random seed
    #[argh(option, short = 's', default = "0")]
    seed: u64,

    /// merge tolerance, overrides the config file
    #[argh(option, short = 't')]
    tolerance: Option<f64>,

    /// path to a JSON file with the locator configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

struct DedupStats {
    input: usize,
    unique: usize,
    nodes: usize,
    leaves: usize,
}

fn load_config(path: Option<&Path>) -> Result<LocatorConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
        }
        None => Ok(LocatorConfig::default()),
    }
}

/// Points in the unit cube, some of them repeating an earlier point with a
/// jitter well below the default tolerance.
fn generate_points(num_points: usize, repeat_ratio: f64, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points: Vec<[f64; 3]> = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        if !points.is_empty() && rng.random_bool(repeat_ratio.clamp(0.0, 1.0)) {
            let base = points[rng.random_range(0..points.len())];
            points.push(base.map(|c| c + rng.random_range(-1e-5..1e-5)));
        } else {
            points.push([rng.random(), rng.random(), rng.random()]);
        }
    }
    points
}

fn dedup(
    points: &[[f64; 3]],
    config: LocatorConfig,
) -> Result<(Vec<[f64; 3]>, DedupStats), Box<dyn std::error::Error>> {
    let mut bounds = create_uninitialized_bounds();
    for p in points {
        bounding_box::add_point(&mut bounds, p);
    }

    let mut locator = IncrementalOctreePointLocator::new(config);
    locator.init_point_insertion(Vec::with_capacity(points.len()), &bounds, points.len())?;

    for p in points {
        locator.insert_unique_point(p)?;
    }

    let (nodes, leaves) = locator
        .octree()
        .map_or((0, 0), |o| (o.number_of_nodes(), o.leaves().count()));
    let merged = locator.free_search_structure().unwrap_or_default();

    let stats = DedupStats {
        input: points.len(),
        unique: merged.len(),
        nodes,
        leaves,
    };
    Ok((merged, stats))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    log::info!("locator config: {config:?}");

    let points = generate_points(args.num_points, args.repeat_ratio, args.seed);
    let now = std::time::Instant::now();
    let (_, stats) = dedup(&points, config)?;
    let elapsed = now.elapsed();

    println!("input points:  {}", stats.input);
    println!("unique points: {}", stats.unique);
    println!("merged points: {}", stats.input - stats.unique);
    println!("octree nodes:  {} ({} leaves)", stats.nodes, stats.leaves);
    println!("elapsed:       {:?}", elapsed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{ "max_points_per_leaf": 16, "tolerance": 0.01 }}"#)?;

        let config = load_config(Some(file.path()))?;
        assert_eq!(config.max_points_per_leaf, 16);
        assert_eq!(config.tolerance, 0.01);
        assert!(!config.build_cubic_octree);

        assert_eq!(load_config(None)?, LocatorConfig::default());
        Ok(())
    }

    #[test]
    fn test_dedup_merges_jittered_repeats() -> Result<(), Box<dyn std::error::Error>> {
        let mut points = generate_points(200, 0.0, 1);
        let repeats: Vec<[f64; 3]> = points[..50].iter().map(|p| p.map(|c| c + 1e-6)).collect();
        points.extend(repeats);

        let (merged, stats) = dedup(&points, LocatorConfig::default())?;
        assert_eq!(stats.input, 250);
        assert_eq!(stats.unique, 200);
        assert_eq!(merged[..], points[..200]);
        Ok(())
    }
}
