//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Rolling frame-time history of the last `N` frames
///
/// Older samples are overwritten once the history is full, so the averages
/// always describe the most recent window.
#[derive(Debug, Clone)]
pub struct FrameStats<const N: usize> {
    history: [f64; N],
    inserted: usize,
}

impl<const N: usize> Default for FrameStats<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameStats<N> {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            history: [0.0; N],
            inserted: 0,
        }
    }

    /// Record the duration of one frame in seconds
    pub fn add_frame_time(&mut self, frame_time: f64) {
        if N == 0 {
            return;
        }
        self.history[self.inserted % N] = frame_time;
        self.inserted += 1;
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.inserted.min(N)
    }

    /// Whether no frame has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    /// Total number of frames ever recorded
    pub fn inserted_count(&self) -> usize {
        self.inserted
    }

    /// Most recent sample, `index` frames back (0 is the newest)
    pub fn last(&self, index: usize) -> Option<f64> {
        if index >= self.len() {
            return None;
        }
        let slot = (self.inserted - 1 - index) % N;
        Some(self.history[slot])
    }

    /// Average frame time over the held samples, 0 when empty
    pub fn average_frame_time(&self) -> f64 {
        let len = self.len();
        if len == 0 {
            return 0.0;
        }
        self.history[..len].iter().sum::<f64>() / len as f64
    }

    /// Average frames per second over the held samples, 0 when unknown
    pub fn average_fps(&self) -> f64 {
        let average = self.average_frame_time();
        if average > 0.0 {
            1.0 / average
        } else {
            0.0
        }
    }
}
