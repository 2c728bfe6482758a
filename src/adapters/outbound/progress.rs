use tracing::info;

use crate::domains::import::ImportProgress;

/// No-op progress sink, useful as default in unit tests.
pub struct NoopProgress;

impl ImportProgress for NoopProgress {
    fn agent_synthesized(&self, _done: usize, _total: usize) {}
}

/// Reports synthesis progress through tracing: one line every `every`
/// agents and one at completion.
pub struct TracingProgress {
    every: usize,
}

impl TracingProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl ImportProgress for TracingProgress {
    fn agent_synthesized(&self, done: usize, total: usize) {
        if done == total || done % self.every == 0 {
            info!("Synthesized {}/{} agents", done, total);
        }
    }
}
