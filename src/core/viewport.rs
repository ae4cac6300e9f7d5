/// Upper bound on the device pixel ratio used for the drawing buffer
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Output area in logical pixels plus the pixel ratio of the drawing buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Clamps dimensions to at least 1 and the ratio to `(0, MAX_PIXEL_RATIO]`
    pub fn new(width: u32, height: u32, device_scale: f64) -> Self {
        let device_scale = device_scale as f32;
        let pixel_ratio = if device_scale.is_finite() && device_scale > 0.0 {
            device_scale.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };

        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Size of the drawing buffer in physical pixels
    pub fn drawable_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1, 1.0)
    }
}

type ResizeHandler<T> = Box<dyn FnMut(&Viewport, &mut T)>;

/// Single owner of the current viewport.
///
/// Consumers registered with [`ViewportState::on_resize`] are invoked in
/// registration order, synchronously inside [`ViewportState::resize`], with
/// mutable access to whatever `T` the host passes in (usually the render
/// stage). After `resize` returns every consumer has seen the new size.
pub struct ViewportState<T> {
    current: Viewport,
    handlers: Vec<ResizeHandler<T>>,
}

impl<T> ViewportState<T> {
    pub fn new(width: u32, height: u32, device_scale: f64) -> Self {
        Self {
            current: Viewport::new(width, height, device_scale),
            handlers: Vec::new(),
        }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    pub fn on_resize(&mut self, handler: impl FnMut(&Viewport, &mut T) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn resize(&mut self, width: u32, height: u32, device_scale: f64, target: &mut T) -> Viewport {
        let next = Viewport::new(width, height, device_scale);
        if next != self.current {
            log::debug!(
                "viewport {}x{}@{} -> {}x{}@{}",
                self.current.width,
                self.current.height,
                self.current.pixel_ratio,
                next.width,
                next.height,
                next.pixel_ratio
            );
        }
        self.current = next;
        self.sync(target);
        next
    }

    /// Pushes the current viewport through every consumer without changing it
    pub fn sync(&mut self, target: &mut T) {
        let viewport = self.current;
        for handler in &mut self.handlers {
            handler(&viewport, target);
        }
    }
}

impl<T> std::fmt::Debug for ViewportState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportState")
            .field("current", &self.current)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
