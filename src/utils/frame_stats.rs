/// On-screen performance counters, driven by the scheduler's frame deltas.
///
/// FPS is averaged over windows of one second of accumulated frame time.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    /// Total frames recorded
    pub frame_count: u64,
    /// Total simulated time in seconds
    pub elapsed: f64,
    /// Delta of the most recent frame in seconds
    pub last_frame_time: f32,
    /// FPS of the last completed window
    pub current_fps: f32,

    window_frames: u32,
    window_time: f32,
}

impl FrameStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame. Returns the new FPS value when a window completes.
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.frame_count += 1;
        self.elapsed += f64::from(dt);
        self.last_frame_time = dt;
        self.window_frames += 1;
        self.window_time += dt;

        if self.window_time >= 1.0 {
            self.current_fps = self.window_frames as f32 / self.window_time;

            self.window_time = 0.0;
            self.window_frames = 0;

            return Some(self.current_fps);
        }

        None
    }

    /// Average frame time of the last completed window, in milliseconds.
    #[must_use]
    pub fn frame_time_ms(&self) -> f32 {
        if self.current_fps > 0.0 {
            1000.0 / self.current_fps
        } else {
            0.0
        }
    }
}
