use crate::time::{TimePoint, WeightedInterval};
#[cfg(not(feature = "rayon"))]
use itertools::Itertools;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Every distinct `start` and `end` of `intervals`, strictly increasing.
///
/// Consecutive boundaries delimit the elementary segments of the timeline: no
/// interval starts or ends strictly inside one, so the set of participants
/// covering it is constant.
///
/// # Examples
/// ```
/// use kairos_libs::boundary::extract;
/// use kairos_libs::time::WeightedInterval;
///
/// let intervals = vec![
///     WeightedInterval::new(9_u32, 12, "user1"),
///     WeightedInterval::new(8, 11, "user2"),
///     WeightedInterval::new(12, 15, "user2"),
/// ];
///
/// assert_eq!(extract(&intervals), vec![8, 9, 11, 12, 15]);
/// ```
pub fn extract<'a, N, T, I>(intervals: I) -> Vec<N>
where
    I: IntoIterator<Item = &'a WeightedInterval<N, T>>,
    N: 'a + TimePoint,
    T: 'a,
{
    let edges = intervals
        .into_iter()
        .flat_map(|interval| [interval.start, interval.end]);

    sort_dedup(edges)
}

#[cfg(not(feature = "rayon"))]
fn sort_dedup<N: TimePoint>(edges: impl Iterator<Item = N>) -> Vec<N> {
    edges.sorted_unstable().dedup().collect_vec()
}

#[cfg(feature = "rayon")]
fn sort_dedup<N: TimePoint>(edges: impl Iterator<Item = N>) -> Vec<N> {
    let mut boundaries: Vec<N> = edges.collect();
    boundaries.par_sort_unstable();
    boundaries.dedup();
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn empty_input_has_no_boundaries() {
        let intervals: Vec<WeightedInterval<u32, &str>> = vec![];
        assert!(extract(&intervals).is_empty());
    }

    #[test]
    fn shared_edges_are_deduplicated() {
        let intervals = vec![
            WeightedInterval::new(8, 21, "user4"),
            WeightedInterval::new(8, 9, "user3"),
            WeightedInterval::new(20, 21, "user3"),
            WeightedInterval::new(9, 12, "user1"),
        ];

        assert_eq!(extract(&intervals), vec![8, 9, 12, 20, 21]);
    }

    #[test]
    fn boundaries_are_strictly_increasing() {
        let intervals = (0..50_i64)
            .map(|i| WeightedInterval::new((i * 7) % 23, (i * 7) % 23 + 5, i))
            .collect::<Vec<_>>();

        let boundaries = extract(&intervals);
        assert!(boundaries.iter().tuple_windows().all(|(a, b)| a < b));
    }
}
