//! Furniture affordance map generator
//!
//! Bins the affordance statistics of every furniture item into a 2D
//! histogram and writes one image per item to `<output>/affordance_plot/`.
//!
//! Usage:
//!   cargo run --bin affordance -- --stats metadata/stats/furnitureAffordance.json --output tmp

use roomviz::{RenderConfig, affordance::run_affordance, init_logging};

fn main() {
    init_logging();

    let config = match RenderConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match run_affordance(&config) {
        Ok(summary) => {
            println!(
                "Rendered {} affordance map(s), skipped {}",
                summary.rendered(),
                summary.skipped()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
