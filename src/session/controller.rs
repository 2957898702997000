//! Frame-driven sampling loop
//!
//! The loop sleeps until a new frame is published on a `watch` channel, runs
//! one tick on the shared session and publishes the result. `watch` keeps only
//! the latest frame, so a slow tick skips stale frames instead of queueing
//! them and the loop never samples faster than frames arrive.

use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{FrameSource, LiveSample, SamplingSession};
use crate::{matching::MatchResult, sampling::Frame, AnalysisError, Result};

/// Session shared between the loop and the host
pub type SharedSession<S> = Arc<Mutex<SamplingSession<S>>>;

/// Tick `session` once per new frame until cancelled or the frame
/// channel closes. A tick that has started always completes.
pub async fn sampling_loop<S>(
    session: SharedSession<S>,
    mut frames: watch::Receiver<Option<Arc<Frame>>>,
    samples: watch::Sender<Option<LiveSample>>,
    cancel_token: CancellationToken,
) where
    S: FrameSource + Send + 'static,
{
    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    info!("frame channel closed, sampling loop exiting");
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                let Some(frame) = frame else {
                    continue;
                };

                let mut guard = session.lock().await;
                match guard.tick(&frame) {
                    Ok(Some(sample)) => {
                        samples.send_replace(Some(sample));
                    }
                    Ok(None) => {}
                    Err(err) => warn!("sampling tick failed: {}", err),
                }
            }
            _ = cancel_token.cancelled() => {
                info!("sampling loop shutting down");
                break;
            }
        }
    }
}

/// Owns the background sampling task for one session
pub struct LiveSamplingController<S: FrameSource> {
    session: SharedSession<S>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl<S> LiveSamplingController<S>
where
    S: FrameSource + Send + 'static,
{
    pub fn new(session: SamplingSession<S>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            handle: None,
            cancel_token: None,
        }
    }

    pub fn session(&self) -> SharedSession<S> {
        Arc::clone(&self.session)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the sampling loop on the current tokio runtime.
    ///
    /// Returns the channel the loop publishes each tick's result on.
    pub fn start(
        &mut self,
        frames: watch::Receiver<Option<Arc<Frame>>>,
    ) -> Result<watch::Receiver<Option<LiveSample>>> {
        if self.handle.is_some() {
            return Err(AnalysisError::InvalidSessionState {
                action: "start sampling".to_string(),
                state: "already sampling".to_string(),
            });
        }

        let cancel_token = CancellationToken::new();
        let (samples_tx, samples_rx) = watch::channel(None);
        let handle = tokio::spawn(sampling_loop(
            self.session(),
            frames,
            samples_tx,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("Sampling loop started");
        Ok(samples_rx)
    }

    /// Cancel the loop and wait for it to finish its current tick
    pub async fn stop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                error!("sampling loop task failed to join: {}", err);
            }
        }
    }

    /// Freeze the session's current matches
    pub async fn capture(&self) -> Result<Vec<MatchResult>> {
        let mut session = self.session.lock().await;
        session.capture().map(<[MatchResult]>::to_vec)
    }

    /// Clear the capture and go back to LIVE
    pub async fn resume(&self) -> Result<()> {
        self.session.lock().await.resume()
    }
}

impl<S: FrameSource> Drop for LiveSamplingController<S> {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::color::Color;
    use crate::config::LiveSamplingConfig;
    use crate::session::state::tests::{catalog, MockCamera};
    use crate::session::SessionState;

    const WAIT: Duration = Duration::from_secs(2);

    fn controller() -> LiveSamplingController<MockCamera> {
        let mut session =
            SamplingSession::new(MockCamera::default(), catalog(), &LiveSamplingConfig::default());
        session.open().unwrap();
        LiveSamplingController::new(session)
    }

    fn frame(color: Color) -> Option<Arc<Frame>> {
        Some(Arc::new(Frame::filled(320, 480, color)))
    }

    #[tokio::test]
    async fn test_loop_publishes_per_frame() {
        let mut controller = controller();
        let (frames_tx, frames_rx) = watch::channel(None);
        let mut samples = controller.start(frames_rx).unwrap();

        frames_tx.send(frame(Color::new(220, 20, 30))).unwrap();
        tokio::time::timeout(WAIT, samples.changed()).await.unwrap().unwrap();
        let sample = samples.borrow_and_update().clone().unwrap();
        assert_eq!(sample.color, Color::new(220, 20, 30));
        assert_eq!(sample.matches[0].entry.id, 3);

        controller.stop().await;
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn test_frozen_session_publishes_nothing() {
        let mut controller = controller();
        let (frames_tx, frames_rx) = watch::channel(None);
        let mut samples = controller.start(frames_rx).unwrap();

        frames_tx.send(frame(Color::WHITE)).unwrap();
        tokio::time::timeout(WAIT, samples.changed()).await.unwrap().unwrap();
        let captured = controller.capture().await.unwrap();
        assert_eq!(captured[0].entry.id, 2);

        frames_tx.send(frame(Color::BLACK)).unwrap();
        let waited = tokio::time::timeout(Duration::from_millis(100), samples.changed()).await;
        assert!(waited.is_err(), "frozen session must not publish");

        {
            let session = controller.session();
            let session = session.lock().await;
            assert_eq!(session.state(), SessionState::Frozen);
            assert_eq!(session.extractor().history().len(), 1);
        }

        controller.resume().await.unwrap();
        frames_tx.send(frame(Color::BLACK)).unwrap();
        tokio::time::timeout(WAIT, samples.changed()).await.unwrap().unwrap();
        assert_eq!(samples.borrow().as_ref().unwrap().color, Color::BLACK);

        controller.stop().await;
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut controller = controller();
        let (_frames_tx, frames_rx) = watch::channel(None);
        controller.start(frames_rx.clone()).unwrap();
        assert!(matches!(
            controller.start(frames_rx),
            Err(AnalysisError::InvalidSessionState { .. })
        ));
        controller.stop().await;
    }

    #[tokio::test]
    async fn test_loop_exits_when_frames_close() {
        let session = controller().session();
        let (frames_tx, frames_rx) = watch::channel(None);
        let (samples_tx, _samples_rx) = watch::channel(None);
        let task = tokio::spawn(sampling_loop(
            session,
            frames_rx,
            samples_tx,
            CancellationToken::new(),
        ));

        drop(frames_tx);
        tokio::time::timeout(WAIT, task).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let mut controller = controller();
        controller.stop().await;
        assert!(!controller.is_running());
    }
}
