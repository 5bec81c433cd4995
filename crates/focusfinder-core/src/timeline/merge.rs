//! Sorting and merging busy intervals into disjoint busy blocks.

use super::interval::TimeInterval;

/// Merge overlapping or touching intervals.
///
/// Input order does not matter; the result is sorted, disjoint and
/// non-touching, so applying it twice returns the same list.
pub fn merge_intervals(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(sorted.len());
    let mut iter = sorted.into_iter();
    let Some(mut current) = iter.next() else {
        return merged;
    };

    for next in iter {
        if next.start <= current.end {
            // Absorb, including full containment.
            if next.end > current.end {
                current = TimeInterval {
                    start: current.start,
                    end: next.end,
                };
            }
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}
