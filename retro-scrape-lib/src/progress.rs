use std::time::Duration;

/// Progress update sent during a scrape run.
///
/// Sent over an unbounded channel so the CLI can display progress while
/// the run is in flight.
#[derive(Debug, Clone)]
pub enum ScrapeEvent {
    /// Inputs are resolved and workers are about to start
    Started {
        /// Files to scrape
        total: usize,
        /// Workers after clamping
        threads: usize,
        /// Entries carried over from the existing document
        preserved: usize,
    },

    /// One file has been aggregated
    Processed(FileProgress),

    /// All workers are done, the cache and document are being written
    Finalizing,
}

/// Per-file progress details.
#[derive(Debug, Clone)]
pub struct FileProgress {
    /// 1-based position in processing order
    pub index: usize,
    pub total: usize,
    pub base_name: String,
    pub found: bool,
    /// Title of the matched game, or the closest candidate for a miss
    pub title: Option<String>,
    pub search_match: u8,
    pub completeness: f64,
    pub elapsed: Duration,
    /// Linear estimate from the average time per file so far
    pub remaining: Duration,
}

impl FileProgress {
    pub fn percent_done(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.index as f64 * 100.0 / self.total as f64
    }
}

/// Estimated time left after `done` of `total` files took `elapsed`.
pub fn estimate_remaining(elapsed: Duration, done: usize, total: usize) -> Duration {
    if done == 0 || done >= total {
        return Duration::ZERO;
    }
    let per_file = elapsed / done as u32;
    per_file * (total - done) as u32
}

/// `HH:MM:SS`, hours not wrapping at 24.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(format_hms(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_hms(Duration::from_secs(3723)), "01:02:03");
        assert_eq!(format_hms(Duration::from_secs(90_000)), "25:00:00");
    }

    #[test]
    fn estimates_linearly() {
        let left = estimate_remaining(Duration::from_secs(10), 5, 15);
        assert_eq!(left, Duration::from_secs(20));
        assert_eq!(estimate_remaining(Duration::from_secs(10), 0, 15), Duration::ZERO);
        assert_eq!(estimate_remaining(Duration::from_secs(10), 15, 15), Duration::ZERO);
    }
}
