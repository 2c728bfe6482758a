/// Port for reporting incremental progress to the caller between agent
/// synthesis steps. Purely advisory: there is no cancellation mid-run,
/// an import either completes or fails at the reading stage.
pub trait ImportProgress {
    fn agent_synthesized(&self, done: usize, total: usize);
}
