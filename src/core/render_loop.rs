use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::clock::{Clock, MonotonicTime};
use super::error::RenderError;
use super::frame::FrameInfo;
use super::viewport::{Viewport, ViewportState};
use crate::scene::BuiltScene;
use crate::traits::{FrameOutcome, FrameScheduler, Rasterizer, TimeSource};

/// Cancellation handle for a running [`RenderLoop`].
///
/// Cloneable and `Send`, so teardown code anywhere can stop the loop. Once
/// stopped the loop never renders or reschedules again.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Everything a tick mutates: the scene and the rasterizer drawing it
pub struct Stage<R> {
    pub scene: BuiltScene,
    pub rasterizer: R,
}

impl<R: Rasterizer + 'static> Stage<R> {
    pub fn new(scene: BuiltScene, rasterizer: R) -> Self {
        Self { scene, rasterizer }
    }

    /// Keeps the camera aspect and the rasterizer targets in step with the viewport
    pub fn register_resize_consumers(viewport: &mut ViewportState<Self>) {
        viewport.on_resize(|viewport, stage: &mut Self| stage.scene.set_aspect(viewport.aspect()));
        viewport.on_resize(|viewport, stage: &mut Self| stage.rasterizer.resize(viewport));
    }
}

/// Continuous render loop driven by the host's refresh signal.
///
/// Each [`RenderLoop::tick`] reads the clock, advances motions, integrates
/// the orbit controls, re-applies the look-at, rasterizes and finally asks
/// the scheduler for the next refresh. Ticks never overlap because the host
/// calls them from its single event thread.
#[derive(Debug)]
pub struct RenderLoop<S: TimeSource = MonotonicTime> {
    clock: Clock<S>,
    state: LoopState,
    token: StopToken,
    frames_submitted: u64,
    last_frame: Option<FrameInfo>,
}

impl RenderLoop<MonotonicTime> {
    pub fn new() -> Self {
        Self::with_time_source(MonotonicTime::new())
    }
}

impl Default for RenderLoop<MonotonicTime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> RenderLoop<S> {
    pub fn with_time_source(source: S) -> Self {
        Self {
            clock: Clock::with_source(source),
            state: LoopState::Idle,
            token: StopToken::default(),
            frames_submitted: 0,
            last_frame: None,
        }
    }

    /// Requests the first frame. Starting twice or after a stop is a no-op.
    pub fn start(&mut self, scheduler: &dyn FrameScheduler) -> StopToken {
        match self.state {
            LoopState::Idle if !self.token.is_stopped() => {
                self.state = LoopState::Running;
                log::debug!("render loop started");
                scheduler.request_frame();
            }
            LoopState::Idle => self.state = LoopState::Stopped,
            LoopState::Running => log::warn!("render loop already running"),
            LoopState::Stopped => log::warn!("render loop cannot be restarted after stop"),
        }
        self.token.clone()
    }

    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            log::debug!("render loop stopped after {} frames", self.frames_submitted);
        }
        self.token.stop();
        self.state = LoopState::Stopped;
    }

    pub fn state(&mut self) -> LoopState {
        if self.token.is_stopped() {
            self.state = LoopState::Stopped;
        }
        self.state
    }

    pub fn is_running(&mut self) -> bool {
        self.state() == LoopState::Running
    }

    pub fn stop_token(&self) -> StopToken {
        self.token.clone()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn last_frame(&self) -> Option<FrameInfo> {
        self.last_frame
    }

    /// One frame at the clock's current time.
    ///
    /// Returns `Ok(None)` when the loop is not running; nothing is rendered
    /// or rescheduled in that case.
    pub fn tick<R: Rasterizer>(
        &mut self,
        stage: &mut Stage<R>,
        viewport: &Viewport,
        scheduler: &dyn FrameScheduler,
    ) -> Result<Option<FrameInfo>, RenderError> {
        if !self.is_running() {
            return Ok(None);
        }
        let t = self.clock.elapsed();
        self.tick_at(t, stage, viewport, scheduler)
    }

    /// Same sequence as [`RenderLoop::tick`] at an explicit time in seconds
    pub fn tick_at<R: Rasterizer>(
        &mut self,
        t: f64,
        stage: &mut Stage<R>,
        viewport: &Viewport,
        scheduler: &dyn FrameScheduler,
    ) -> Result<Option<FrameInfo>, RenderError> {
        if !self.is_running() {
            return Ok(None);
        }

        let scene = &mut stage.scene;
        scene.apply_motions(t as f32);
        scene.update_controls();
        scene.apply_look_at();

        let outcome = match stage.rasterizer.render(&stage.scene, viewport) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("render failed, stopping loop: {err}");
                self.stop();
                return Err(err);
            }
        };

        let frame = match self.last_frame {
            Some(previous) => previous.next(t),
            None => FrameInfo::new(0, t, 0.0),
        };
        self.last_frame = Some(frame);
        if outcome == FrameOutcome::Presented {
            self.frames_submitted += 1;
        }

        // A stop requested while rendering still cancels the next frame
        if self.is_running() {
            scheduler.request_frame();
        }

        Ok(Some(frame))
    }
}
