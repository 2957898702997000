//! Command-line interface for polish_match
//!
//! Matches a photo of a nail-polish swatch against a JSON catalog and prints
//! the result as JSON on stdout, with a human summary on stderr.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use polish_match::{
    analyze_image_debug, image_loader, Catalog, DebugOutput, EngineConfig, ThresholdMatch,
};

#[derive(Debug, Parser)]
struct Args {
    /// Photo to analyze (.jpg/.png/.webp/.bmp)
    image: PathBuf,
    /// Catalog of reference swatches
    #[arg(long, short, default_value = "demos/catalog.json")]
    catalog: PathBuf,
    /// Engine configuration (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for the normalized, enhanced and annotated canvases
    #[arg(long)]
    debug: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Err(error) = run(&args) {
        eprintln!("Analysis failed: {}", error);
        if error.is_recoverable() {
            eprintln!("Suggestion: {}", error.user_message());
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> polish_match::Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let catalog = Catalog::from_json_file(&args.catalog)?;
    let frame = image_loader::load_frame(&args.image)?;

    let (result, debug) = analyze_image_debug(&frame, &catalog, &config.still)?;
    print_result(&result);

    if let Some(dir) = &args.debug {
        save_debug_output(&debug, dir, &args.image);
    }
    Ok(())
}

fn save_debug_output(debug: &DebugOutput, output_dir: &Path, input_path: &Path) {
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        eprintln!("Warning: Failed to create output directory: {}", e);
        return;
    }

    let base_name = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let images = [
        ("canvas", &debug.canvas),
        ("enhanced", &debug.enhanced),
        ("annotated", &debug.annotated),
    ];
    for (suffix, image) in images {
        let path = output_dir.join(format!("{}_{}.png", base_name, suffix));
        match image.save(&path) {
            Ok(()) => eprintln!("Debug: Saved {} image to {}", suffix, path.display()),
            Err(e) => eprintln!("Warning: Failed to save {} image: {}", suffix, e),
        }
    }
    eprintln!(
        "Debug: Region {}, dominant {} ({} pixels counted, {} skipped)",
        debug.region,
        debug.dominant.color.to_hex(),
        debug.dominant.counted_pixels,
        debug.dominant.skipped_pixels
    );
}

fn print_result(result: &ThresholdMatch) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    eprintln!();
    eprintln!("Match Summary:");
    eprintln!("  Extracted: {} ({})", result.extracted.to_hex(), result.extracted.family());
    eprintln!(
        "  {}: {} by {} [{}]",
        if result.found { "Match" } else { "Closest" },
        result.entry.name,
        result.entry.brand,
        result.entry.id
    );
    eprintln!("  Similarity: {:.1}%", result.similarity * 100.0);
}
