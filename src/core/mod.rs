pub mod clock;
pub mod controller;
pub mod error;
pub mod fps;
pub mod frame;
pub mod gpu_context;
pub mod input_adapter;
pub mod render_loop;
pub mod viewport;

pub use clock::{Clock, ManualTime, MonotonicTime};
pub use controller::{Button, Controller, PointerDelta};
pub use error::RenderError;
pub use fps::FpsCounter;
pub use frame::FrameInfo;
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use render_loop::{LoopState, RenderLoop, Stage, StopToken};
pub use viewport::{Viewport, ViewportState, MAX_PIXEL_RATIO};
