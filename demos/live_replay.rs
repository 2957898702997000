//! Replay still images as a simulated camera feed
//!
//! Drives a live sampling session from a list of image files (or a
//! directory of them), printing the smoothed color and best match for each
//! frame, then captures and prints the frozen matches as JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use polish_match::{
    image_loader, AnalysisError, Catalog, EngineConfig, Frame, FrameSource,
    LiveSamplingController, SamplingSession,
};
use tokio::sync::watch;

#[derive(Debug, Parser)]
struct Args {
    /// Image files or directories to replay, in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Catalog of reference swatches
    #[arg(long, short, default_value = "demos/catalog.json")]
    catalog: PathBuf,
    /// Engine configuration (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames per second
    #[arg(long, default_value = "10")]
    fps: u32,
    /// Times to loop over the inputs before capturing
    #[arg(long, default_value = "1")]
    loops: u32,
}

/// Camera stand-in that decodes its frames when started
struct ReplayCamera {
    paths: Vec<PathBuf>,
    frames: Vec<Arc<Frame>>,
}

impl ReplayCamera {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            frames: Vec::new(),
        }
    }
}

impl FrameSource for ReplayCamera {
    fn acquire(&mut self) -> polish_match::Result<()> {
        if self.paths.is_empty() {
            return Err(AnalysisError::DeviceUnavailable {
                message: "no frames to replay".to_string(),
                source: None,
            });
        }
        self.frames = self
            .paths
            .iter()
            .map(|path| image_loader::load_frame(path).map(Arc::new))
            .collect::<polish_match::Result<_>>()
            .map_err(|e| AnalysisError::device("cannot decode replay frame", e))?;
        info!("Replay camera started with {} frames", self.frames.len());
        Ok(())
    }

    fn release(&mut self) {
        self.frames.clear();
    }
}

fn collect_inputs(inputs: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(image_loader::is_supported_extension)
                })
                .collect();
            entries.sort();
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

/// Send `frames` `loops` times at one frame per `period`, returning how many
/// were delivered. Stops at the first send after the sampling loop is gone.
async fn replay(
    frames: &[Arc<Frame>],
    frames_tx: &watch::Sender<Option<Arc<Frame>>>,
    period: Duration,
    loops: u32,
) -> usize {
    let mut ticker = tokio::time::interval(period);
    let mut sent = 0;
    'replay: for _ in 0..loops.max(1) {
        for frame in frames {
            ticker.tick().await;
            if frames_tx.send(Some(Arc::clone(frame))).is_err() {
                warn!("sampling loop is gone, stopping replay");
                break 'replay;
            }
            sent += 1;
        }
    }
    sent
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(error) = run(args).await {
        eprintln!("Replay failed: {}", error);
        if error.is_recoverable() {
            eprintln!("Suggestion: {}", error.user_message());
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> polish_match::Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let catalog = Arc::new(Catalog::from_json_file(&args.catalog)?);
    let paths = collect_inputs(&args.inputs)
        .map_err(|e| AnalysisError::device("cannot list replay inputs", e))?;

    let mut session = SamplingSession::new(ReplayCamera::new(paths), catalog, &config.live);
    session.open()?;
    let frames: Vec<Arc<Frame>> = session.source().frames.clone();

    let mut controller = LiveSamplingController::new(session);
    let (frames_tx, frames_rx) = watch::channel(None);
    let mut samples = controller.start(frames_rx)?;

    let printer = tokio::spawn(async move {
        while samples.changed().await.is_ok() {
            let Some(sample) = samples.borrow_and_update().clone() else {
                continue;
            };
            match sample.matches.first() {
                Some(best) => println!(
                    "{} {:<6} -> {} ({:.1}%)",
                    sample.hex, sample.family, best.entry.name, best.similarity
                ),
                None => println!("{} {}", sample.hex, sample.family),
            }
        }
    });

    let period = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);
    let sent = replay(&frames, &frames_tx, period, args.loops).await;
    info!("Replayed {} frames", sent);
    // let the last frame be sampled
    tokio::time::sleep(period).await;

    let captured = controller.capture().await?;
    controller.stop().await;
    drop(frames_tx);
    printer.abort();

    match serde_json::to_string_pretty(&captured) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing capture: {}", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polish_match::Color;

    fn frames(count: usize) -> Vec<Arc<Frame>> {
        (0..count)
            .map(|_| Arc::new(Frame::filled(4, 4, Color::BLACK)))
            .collect()
    }

    #[tokio::test]
    async fn test_replay_sends_every_loop() {
        let (tx, _rx) = watch::channel(None);
        let sent = replay(&frames(3), &tx, Duration::from_millis(1), 2).await;
        assert_eq!(sent, 6);
    }

    #[tokio::test]
    async fn test_replay_stops_all_loops_without_receiver() {
        let (tx, rx) = watch::channel(None);
        drop(rx);
        let sent = replay(&frames(3), &tx, Duration::from_millis(1), 5).await;
        assert_eq!(sent, 0);
    }
}
