//! pixelforge-cli: a small demo harness around the measurement engine.
//!
//! File-format I/O is outside this crate's scope, so the demo builds a
//! synthetic labeled image (two rectangular objects plus a disc) in memory,
//! measures the requested features over it, and prints the resulting table.

use clap::Parser;
use colored::Colorize;

use pixelforge::image::{DynImage, Image};
use pixelforge::measurement::features::register_all;
use pixelforge::measurement::{measure, FeatureRegistry};
use pixelforge::serialize::write_csv;
use pixelforge::types::TensorShape;

#[derive(Parser)]
#[command(name = "pixelforge-cli")]
#[command(about = "Measure per-object features over a synthetic demo image", long_about = None)]
#[command(version)]
struct Cli {
    /// Feature names to measure, comma-separated.
    #[arg(long, value_delimiter = ',', default_value = "Size,Gravity,Statistics,P2A")]
    features: Vec<String>,

    /// Emit CSV instead of the aligned plain-text table.
    #[arg(long)]
    csv: bool,

    /// Use the single-line combined CSV header (only with --csv).
    #[arg(long)]
    simple: bool,

    /// Worker thread count for the frameworks backing the measurement passes.
    #[arg(long)]
    threads: Option<usize>,
}

/// Builds a 64x48 label image with three nonoverlapping objects, plus a
/// grey-value image brighter toward the top-left corner.
fn demo_images() -> (Image<u32>, DynImage) {
    let sizes = vec![64, 48];
    let mut label = Image::<u32>::raw(sizes.clone());
    label.reforge(sizes.clone(), TensorShape::Scalar, 1);
    let mut grey = Image::<f64>::raw(sizes.clone());
    grey.reforge(sizes.clone(), TensorShape::Scalar, 1);

    for y in 0..48 {
        for x in 0..64 {
            let id = if (8..20).contains(&x) && (6..18).contains(&y) {
                1
            } else if (30..50).contains(&x) && (10..40).contains(&y) {
                2
            } else {
                let (cx, cy) = (55.0_f64, 40.0_f64);
                let (dx, dy) = (x as f64 - cx, y as f64 - cy);
                if dx * dx + dy * dy <= 36.0 {
                    3
                } else {
                    0
                }
            };
            label.set(&[x, y], 0, id).unwrap();
            let value = 255.0 - (x as f64 + y as f64) * 2.0;
            grey.set(&[x, y], 0, value.max(0.0)).unwrap();
        }
    }

    (label, DynImage::F64(grey))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(n) = cli.threads {
        pixelforge::config::set_number_of_threads(n);
    }

    let (label, grey) = demo_images();
    let mut registry = FeatureRegistry::new();
    if let Err(e) = register_all(&mut registry) {
        eprintln!("{} {}", "Error registering feature catalog:".red(), e);
        std::process::exit(1);
    }

    log::info!("measuring {} feature(s) over a {}x{} demo image", cli.features.len(), 64, 48);

    let table = match measure(&label, Some(&grey), &cli.features, None, &mut registry) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{} {}", "measurement failed:".red(), e);
            std::process::exit(1);
        }
    };

    if cli.csv {
        print!("{}", write_csv(&table, cli.simple));
    } else {
        println!("{}", "pixelforge demo measurement".cyan().bold());
        println!("{table}");
    }
}
