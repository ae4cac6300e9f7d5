use std::sync::Arc;

use winit::window::Window as WinitWindow;

use crate::core::viewport::Viewport;
use crate::traits::FrameScheduler;

/// Wrapper around the winit window that paces the render loop
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    pub fn inner(&self) -> &Arc<WinitWindow> {
        &self.inner
    }

    pub fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    /// Current client area as a [`Viewport`] in logical pixels
    pub fn viewport(&self) -> Viewport {
        let scale = self.scale_factor();
        let logical = self.inner.inner_size().to_logical::<f64>(scale);
        Viewport::new(logical.width.round() as u32, logical.height.round() as u32, scale)
    }
}

impl FrameScheduler for Window {
    // Winit coalesces repeated requests into a single RedrawRequested
    fn request_frame(&self) {
        self.inner.request_redraw();
    }
}
