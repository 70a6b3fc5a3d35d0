use std::collections::VecDeque;
use std::time::Duration;

/// Running average of the frame rate over the last few frames.
#[derive(Debug, Default)]
pub struct FramesPerSecond {
    time_history: VecDeque<f32>,
    since_report: Duration,
}

impl FramesPerSecond {
    pub const RUNNING_AVG_LENGTH: usize = 10;
    pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            time_history: VecDeque::<f32>::with_capacity(Self::RUNNING_AVG_LENGTH),
            since_report: Duration::ZERO,
        }
    }

    /// Records a frame and hands back the average once per report interval.
    pub fn update(&mut self, dt: Duration) -> Option<f32> {
        self.time_history.push_front(dt.as_secs_f32());
        if self.time_history.len() > Self::RUNNING_AVG_LENGTH {
            self.time_history.pop_back();
        }

        self.since_report += dt;
        if self.since_report >= Self::REPORT_INTERVAL {
            self.since_report = Duration::ZERO;
            Some(self.get_avg_fps())
        } else {
            None
        }
    }

    /// Zero until a frame with a measurable duration has been seen.
    pub fn get_avg_fps(&self) -> f32 {
        let sum: f32 = self.time_history.iter().sum();
        if sum <= 0.0 {
            return 0.0;
        }
        self.time_history.len() as f32 / sum
    }
}
