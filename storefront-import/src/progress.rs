//! Progress reporting for batch jobs.

/// How often [`LogProgress`] reports a record count.
pub const PROGRESS_INTERVAL: usize = 50;

/// Trait for receiving batch progress updates.
pub trait ImportProgress {
    /// Called after each record is processed.
    fn on_record(&self, current: usize, total: usize, name: &str);

    /// Called when a phase starts (e.g., "Checking 120 product slugs").
    fn on_phase(&self, message: &str);

    /// Called when the job is complete.
    fn on_complete(&self, message: &str);

    /// Running totals, sent every [`PROGRESS_INTERVAL`] records.
    fn on_summary(&self, _message: &str) {}
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_record(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_record(&self, current: usize, total: usize, name: &str) {
        if current % PROGRESS_INTERVAL == 0 || current == total {
            let pct = if total > 0 {
                current as f64 / total as f64 * 100.0
            } else {
                100.0
            };
            log::info!("  [{}/{}] ({:.1}%) {}", current, total, pct, name);
        } else {
            log::debug!("  [{}/{}] {}", current, total, name);
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_summary(&self, message: &str) {
        log::info!("  {}", message);
    }
}
