/// Seconds between FPS reports
pub const FPS_UPDATE_INTERVAL: f64 = 1.0;

/// Rolling frames-per-second estimate, refreshed once per interval
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u32,
    timer: f64,
    fps: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame; returns the new estimate when the interval elapses
    pub fn update(&mut self, delta: f64) -> Option<f64> {
        self.frame_count += 1;
        self.timer += delta;

        if self.timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f64 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}
