//! LIVE/FROZEN sampling session
//!
//! A session owns the frame source (camera) and the smoothing history. While
//! LIVE every delivered frame is sampled, smoothed and ranked against the
//! catalog. Capturing freezes the latest matches and releases the device;
//! resuming clears the capture and starts over with an empty history.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    color::{AveragingExtractor, Color, ColorFamily},
    config::LiveSamplingConfig,
    matching::{rank_matches, Catalog, MatchResult},
    sampling::{Frame, Region, RegionSampler},
    AnalysisError, Result,
};

/// Whether sampling is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    Live,
    Frozen,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Live => write!(f, "LIVE"),
            SessionState::Frozen => write!(f, "FROZEN"),
        }
    }
}

/// Camera-like device that delivers frames while acquired.
///
/// `release` must be safe to call when nothing is held, including right
/// after a failed `acquire`.
pub trait FrameSource {
    /// Start the device. Failures should be `DeviceUnavailable`.
    fn acquire(&mut self) -> Result<()>;

    /// Stop the device and free it for other users
    fn release(&mut self);
}

/// Result of one live sampling tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSample {
    /// Smoothed color (mean of the history)
    pub color: Color,
    pub hex: String,
    pub family: ColorFamily,
    /// Unsmoothed mean of this frame's region
    pub instantaneous: Color,
    /// Best catalog matches, most similar first
    pub matches: Vec<MatchResult>,
    /// Region that was sampled
    pub region: Region,
}

/// Live sampling state machine for one camera
pub struct SamplingSession<S: FrameSource> {
    source: S,
    state: SessionState,
    streaming: bool,
    sampler: RegionSampler,
    extractor: AveragingExtractor,
    catalog: Arc<Catalog>,
    max_matches: usize,
    latest: Option<LiveSample>,
    captured: Vec<MatchResult>,
}

impl<S: FrameSource> SamplingSession<S> {
    /// Create a LIVE session; the device is not acquired until [`open`](Self::open)
    pub fn new(source: S, catalog: Arc<Catalog>, config: &LiveSamplingConfig) -> Self {
        Self {
            source,
            state: SessionState::Live,
            streaming: false,
            sampler: RegionSampler::live(config.radius),
            extractor: AveragingExtractor::new(config.history_capacity),
            catalog,
            max_matches: config.max_matches,
            latest: None,
            captured: Vec::new(),
        }
    }

    /// Acquire the frame source and start streaming
    pub fn open(&mut self) -> Result<()> {
        if self.state == SessionState::Frozen {
            return Err(self.invalid_state("open"));
        }
        if self.streaming {
            return Ok(());
        }
        self.acquire()?;
        info!("Session opened, sampling LIVE");
        Ok(())
    }

    /// Sample one frame.
    ///
    /// Returns `Ok(None)` without touching any state when the session is
    /// FROZEN or the device is not streaming. On error the history is left
    /// as it was.
    pub fn tick(&mut self, frame: &Frame) -> Result<Option<LiveSample>> {
        if self.state == SessionState::Frozen || !self.streaming {
            debug!("Skipping tick while {} (streaming: {})", self.state, self.streaming);
            return Ok(None);
        }

        let sample = self.sampler.sample(frame)?;
        let instantaneous = AveragingExtractor::instantaneous(&sample)?;
        let color = self.extractor.push(instantaneous);
        let matches = rank_matches(color, &self.catalog, self.max_matches);

        debug!(
            "Tick {}: instantaneous {}, smoothed {} ({} samples), best {:?}",
            sample.region(),
            instantaneous.to_hex(),
            color.to_hex(),
            self.extractor.history().len(),
            matches.first().map(|m| m.entry.id)
        );

        let live = LiveSample {
            color,
            hex: color.to_hex(),
            family: color.family(),
            instantaneous,
            matches,
            region: sample.region(),
        };
        self.latest = Some(live.clone());
        Ok(Some(live))
    }

    /// Freeze the current matches and stop the device
    pub fn capture(&mut self) -> Result<&[MatchResult]> {
        if self.state == SessionState::Frozen {
            return Err(self.invalid_state("capture"));
        }

        self.captured = self
            .latest
            .as_ref()
            .map(|sample| sample.matches.clone())
            .unwrap_or_default();
        self.release();
        self.state = SessionState::Frozen;
        info!("Captured {} matches, session FROZEN", self.captured.len());
        Ok(&self.captured)
    }

    /// Clear the capture and history, restart the device and go LIVE.
    ///
    /// If the device cannot be restarted the session stays FROZEN with its
    /// capture intact.
    pub fn resume(&mut self) -> Result<()> {
        if self.state == SessionState::Live {
            return Err(self.invalid_state("resume"));
        }

        self.acquire()?;
        self.captured.clear();
        self.latest = None;
        self.extractor.reset();
        self.state = SessionState::Live;
        info!("Session resumed, sampling LIVE");
        Ok(())
    }

    /// Release the device. Also done on drop.
    pub fn close(&mut self) {
        if self.streaming {
            self.release();
            info!("Session closed");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Matches frozen by the last capture
    pub fn captured(&self) -> &[MatchResult] {
        &self.captured
    }

    /// Most recent tick result
    pub fn latest(&self) -> Option<&LiveSample> {
        self.latest.as_ref()
    }

    pub fn extractor(&self) -> &AveragingExtractor {
        &self.extractor
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn acquire(&mut self) -> Result<()> {
        if let Err(err) = self.source.acquire() {
            // a half-started device still has to be let go
            self.source.release();
            warn!("Failed to acquire frame source: {}", err);
            return Err(match err {
                AnalysisError::DeviceUnavailable { .. } => err,
                other => AnalysisError::device("frame source failed to start", other),
            });
        }
        self.streaming = true;
        Ok(())
    }

    fn release(&mut self) {
        if self.streaming {
            self.source.release();
            self.streaming = false;
            debug!("Frame source released");
        }
    }

    fn invalid_state(&self, action: &str) -> AnalysisError {
        AnalysisError::InvalidSessionState {
            action: action.to_string(),
            state: self.state.to_string(),
        }
    }
}

impl<S: FrameSource> Drop for SamplingSession<S> {
    fn drop(&mut self) {
        self.release();
    }
}
