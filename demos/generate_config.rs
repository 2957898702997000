//! Generate the default engine configuration file
//!
//! Creates a JSON config with all default parameters

use polish_match::EngineConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} config/engine.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = EngineConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!(
                "  Live:  radius {}px, history {} frames, top {} matches",
                config.live.radius, config.live.history_capacity, config.live.max_matches
            );
            eprintln!(
                "  Still: {}px canvas, region {:.0}%x{:.0}% ({:+.0}% vertical)",
                config.still.canvas_size,
                config.still.region.width_ratio * 100.0,
                config.still.region.height_ratio * 100.0,
                config.still.region.vertical_offset_ratio * 100.0
            );
            eprintln!(
                "  Voting: buckets {}/{}, background above {:.0}",
                config.still.voting.fine_bucket,
                config.still.voting.coarse_bucket,
                config.still.voting.background_brightness
            );
            eprintln!(
                "  Match threshold {:.0}%, timeout {}ms",
                config.still.match_threshold * 100.0,
                config.still.timeout_ms
            );
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
