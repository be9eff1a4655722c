//! Splitting `[0, len)` into contiguous worker ranges.

use std::ops::Range;

/// Partition `0..len` into at most `workers` contiguous, disjoint, non-empty
/// ranges that together cover every index exactly once.
///
/// The worker count is clamped to `1..=len`. Every range has `len / workers`
/// elements except the last, which also absorbs the remainder and always
/// ends at exactly `len`. Returns no ranges when `len == 0`.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, len);
    let size = len / workers;
    (0..workers)
        .map(|i| {
            let start = i * size;
            let end = if i == workers - 1 { len } else { (i + 1) * size };
            start..end
        })
        .collect()
}
