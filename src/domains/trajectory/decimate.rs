use super::types::TrajectorySample;

/// Reduces a dense track to every `stride`-th sample by positional index,
/// keeping the final sample unconditionally so an agent's terminal position
/// is never lost to decimation. A stride of 1 is the identity transform.
///
/// Strides below 1 are a caller contract violation and must be rejected
/// before calling (see `ImportRequest::new`).
pub fn decimate(samples: &[TrajectorySample], stride: usize) -> Vec<TrajectorySample> {
    debug_assert!(stride >= 1, "stride must be validated by the caller");
    let stride = stride.max(1);

    let mut retained: Vec<TrajectorySample> = samples.iter().step_by(stride).cloned().collect();
    if let Some(last) = samples.last() {
        if retained.last().map(|s| s.frame) != Some(last.frame) {
            retained.push(last.clone());
        }
    }
    retained
}
