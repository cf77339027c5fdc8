//! Progress reporting

/// Receives progress updates during a run
///
/// Purely observational; the run never waits on a sink.
pub trait ProgressSink {
    /// Report `completed` out of `total` for the current stage
    fn report(&mut self, completed: usize, total: usize, message: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize, &str),
{
    fn report(&mut self, completed: usize, total: usize, message: &str) {
        self(completed, total, message);
    }
}

/// Discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _completed: usize, _total: usize, _message: &str) {}
}

/// Forwards updates to the `log` crate at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, completed: usize, total: usize, message: &str) {
        log::debug!("{message}: {completed}/{total}");
    }
}
