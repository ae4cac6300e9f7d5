/// Timing of one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInfo {
    /// Zero-based index of the frame
    pub number: u64,
    /// Seconds since the render loop's clock started
    pub time: f64,
    /// Seconds since the previous frame; zero for the first one
    pub delta: f64,
}

impl FrameInfo {
    pub fn new(number: u64, time: f64, delta: f64) -> Self {
        Self { number, time, delta }
    }

    /// Frame that follows `self` at `time`
    pub fn next(&self, time: f64) -> Self {
        Self {
            number: self.number + 1,
            time,
            delta: (time - self.time).max(0.0),
        }
    }
}
