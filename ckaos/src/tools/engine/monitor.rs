use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

/// Progress hook and cancellation check for grid growth.
///
/// `on_step` is called once per growth step of every pattern source, from
/// worker threads.
pub trait GrowthMonitor: Send + Sync {
    fn on_step(
        &self,
        source: &str,
        zoom: usize,
        target: usize,
    );

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Monitor that reports nothing and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl GrowthMonitor for NoopMonitor {
    fn on_step(
        &self,
        _source: &str,
        _zoom: usize,
        _target: usize,
    ) {
    }
}

/// A raised flag cancels growth at the next step.
impl GrowthMonitor for AtomicBool {
    fn on_step(
        &self,
        _source: &str,
        _zoom: usize,
        _target: usize,
    ) {
    }

    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}
