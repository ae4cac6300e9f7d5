//! Seams between the render loop and the host: time, frame pacing and the GPU.

use crate::core::error::RenderError;
use crate::core::viewport::Viewport;
use crate::scene::BuiltScene;

/// Monotonic seconds from an arbitrary origin
pub trait TimeSource {
    fn seconds(&self) -> f64;
}

/// Host refresh signal: asks for one more tick at the next display refresh
pub trait FrameScheduler {
    fn request_frame(&self);
}

/// What became of a render request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Submitted to the GPU and presented
    Presented,
    /// No output target this refresh (outdated surface, acquire timeout)
    Skipped,
}

/// Draws a scene into the current output target
pub trait Rasterizer {
    /// Reallocate size-dependent targets for a new viewport
    fn resize(&mut self, viewport: &Viewport);

    /// Render one frame of `scene` from its camera
    fn render(&mut self, scene: &BuiltScene, viewport: &Viewport)
        -> Result<FrameOutcome, RenderError>;
}
