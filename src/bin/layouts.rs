//! Sampled room layout sketches
//!
//! Draws the room boundary and every named furniture footprint (labelled
//! when `--font` is given) for each sampled room JSON.
//!
//! Usage:
//!   cargo run --bin layouts -- --input tmp/samples/bedroom/json --output tmp/figures/bedroom
//!   cargo run --bin layouts -- --input samples --font fonts/DejaVuSans.ttf --axes 0,2

use roomviz::{BatchKind, RenderConfig, init_logging, init_parallel, run_batch};

fn main() {
    init_logging();

    // Layout vertices are 3D; draw on `layout_axes` (floor plane by default)
    let config = match RenderConfig::from_args() {
        Ok(config) => config.for_layouts(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_parallel(config.threads);

    match run_batch(&config, BatchKind::Layouts) {
        Ok(summary) => {
            println!(
                "Sketched {} room(s), skipped {} -> {}",
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
