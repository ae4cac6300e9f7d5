use thiserror::Error;

/// Failures that stop the render loop
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window surface")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter compatible with the window surface")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("surface does not support this adapter")]
    UnsupportedSurface,

    #[error("rendering context lost: {0}")]
    ContextLost(String),

    #[error("GPU ran out of memory")]
    OutOfMemory,

    #[error("scene has no camera to render from")]
    MissingCamera,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_descriptive() {
        let err = RenderError::ContextLost("surface lost".into());
        assert_eq!(err.to_string(), "rendering context lost: surface lost");
        assert_eq!(RenderError::OutOfMemory.to_string(), "GPU ran out of memory");
    }
}
