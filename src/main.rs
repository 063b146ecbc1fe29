//! Room heatmap renderer
//!
//! Renders `{room}_trajectories.png` and `{room}_heatmap.png` for every room
//! JSON in the input directory.
//!
//! Usage:
//!   cargo run --bin roomviz
//!   cargo run --bin roomviz -- --input tmp/heatmaps --output tmp/heatmaps/figures
//!   cargo run --bin roomviz -- --scale 50 --sigma 3 --threads 4
//!   cargo run --bin roomviz -- --config config/roomviz.toml --font fonts/DejaVuSans.ttf

use roomviz::{BatchKind, RenderConfig, init_logging, init_parallel, run_batch};

fn main() {
    init_logging();

    let config = match RenderConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_parallel(config.threads);

    match run_batch(&config, BatchKind::Heatmaps) {
        Ok(summary) => {
            println!(
                "Rendered {} room(s), skipped {} -> {}",
                summary.rendered(),
                summary.skipped(),
                config.output_dir.display()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
