//! Replays a CSV of `x,y,z` readings through a monitor.
//!
//! Usage:
//!     cargo run --example replay -- demos/data/points.csv --min-distance 8

use clap::Parser;
use proxgrid::{Config, Monitor, Point};
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "replay", version, about)]
struct Args {
    /// CSV file with one `x,y,z` reading per line
    #[arg(default_value = "demos/data/points.csv")]
    input: PathBuf,

    /// Minimum separation distance
    #[arg(long, default_value_t = proxgrid::DEFAULT_MIN_DISTANCE)]
    min_distance: f64,

    /// Violations needed before a reading buzzes
    #[arg(long, default_value_t = 1)]
    alert_threshold: usize,
}

fn parse_point(line: &str) -> Option<Point> {
    let mut iter = line.split(',').map(|value| value.trim().parse::<f64>());
    let x = iter.next()?.ok()?;
    let y = iter.next()?.ok()?;
    let z = iter.next()?.ok()?;
    if iter.next().is_some() {
        return None;
    }
    Some([x, y, z])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::new(args.min_distance).with_alert_threshold(args.alert_threshold);
    let mut monitor = Monitor::new(config)?;

    let file = std::fs::File::open(&args.input)?;
    for (number, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(point) = parse_point(&line) else {
            log::warn!("line {}: cannot parse {line:?}", number + 1);
            continue;
        };
        match monitor.record(point) {
            Ok(action) => println!("{point:?} -> {action}"),
            Err(err) => log::warn!("line {}: {err}", number + 1),
        }
    }

    let stats = monitor.grid().stats();
    println!("Readings: {}", monitor.history().len());
    println!("Violations: {}", monitor.total_violations());
    println!("Cells: {} (largest bucket {})", stats.cells, stats.largest_bucket);
    Ok(())
}
