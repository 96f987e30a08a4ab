use crate::boundary;
use crate::schedule::ScheduleError;
use crate::time::{TimePoint, WeightedInterval};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::ops::Range;

/// Precomputed coverage of every elementary segment.
///
/// Built once with a sweep over the compressed boundaries, after which it is
/// query-only. `segments[i]` holds the tags covering
/// `[boundaries[i], boundaries[i + 1])`.
#[derive(Debug, Clone)]
pub struct IntervalStore<N, T> {
    boundaries: Vec<N>,
    segments: Vec<BTreeSet<T>>,
}

impl<N, T> Default for IntervalStore<N, T> {
    fn default() -> Self {
        IntervalStore {
            boundaries: Vec::new(),
            segments: Vec::new(),
        }
    }
}

impl<N, T> IntervalStore<N, T>
where
    N: TimePoint,
    T: Ord + Clone + Debug,
{
    /// Builds the store from `intervals`.
    ///
    /// Intervals of the same tag may overlap or abut, they are not required to be
    /// merged beforehand.
    ///
    /// # Errors
    /// `ScheduleError::InvalidInterval` for the first interval that does not end
    /// after it starts. Nothing is built in that case.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::store::IntervalStore;
    /// use kairos_libs::time::WeightedInterval;
    ///
    /// let store = IntervalStore::from_intervals(&[
    ///     WeightedInterval::new(9_u32, 12, "user1"),
    ///     WeightedInterval::new(8, 11, "user2"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(store.boundaries(), &[8, 9, 11, 12]);
    /// assert!(store.covering_tags(9, 11).into_iter().eq(["user1", "user2"]));
    /// assert!(store.covering_tags(11, 12).into_iter().eq(["user1"]));
    /// ```
    pub fn from_intervals(
        intervals: &[WeightedInterval<N, T>],
    ) -> Result<Self, ScheduleError<N, T>> {
        if let Some(invalid) = intervals.iter().find(|interval| !interval.is_valid()) {
            return Err(ScheduleError::InvalidInterval {
                start: invalid.start,
                end: invalid.end,
                tag: invalid.tag.clone(),
            });
        }

        let boundaries = boundary::extract(intervals);
        if boundaries.len() < 2 {
            return Ok(IntervalStore::default());
        }

        // Tags opening and closing at each boundary index
        let mut openings: Vec<Vec<&T>> = vec![Vec::new(); boundaries.len()];
        let mut closings: Vec<Vec<&T>> = vec![Vec::new(); boundaries.len()];
        for interval in intervals {
            let start = position(&boundaries, interval.start);
            let end = position(&boundaries, interval.end);
            if let Some(tags) = openings.get_mut(start) {
                tags.push(&interval.tag);
            }
            if let Some(tags) = closings.get_mut(end) {
                tags.push(&interval.tag);
            }
        }

        let mut active: BTreeMap<&T, usize> = BTreeMap::new();
        let segments = closings
            .iter()
            .zip(openings.iter())
            .take(boundaries.len() - 1)
            .map(|(closing, opening)| {
                for &tag in closing {
                    if let Some(count) = active.get_mut(tag) {
                        *count -= 1;
                        if *count == 0 {
                            active.remove(tag);
                        }
                    }
                }
                for &tag in opening {
                    *active.entry(tag).or_insert(0) += 1;
                }
                active.keys().map(|&tag| tag.clone()).collect::<BTreeSet<T>>()
            })
            .collect::<Vec<_>>();

        debug!(
            "interval store built from {} intervals: {} boundaries, {} elementary segments",
            intervals.len(),
            boundaries.len(),
            segments.len()
        );

        Ok(IntervalStore {
            boundaries,
            segments,
        })
    }

    /// Distinct tags of the intervals overlapping the half-open range `[a, b)`.
    ///
    /// Between two adjacent boundaries this is a single lookup. Wider ranges
    /// return the union over every elementary segment they touch.
    pub fn covering_tags(&self, a: N, b: N) -> BTreeSet<T> {
        if a >= b {
            return BTreeSet::new();
        }

        let first = self
            .boundaries
            .partition_point(|&boundary| boundary <= a)
            .saturating_sub(1);
        let last = self.boundaries.partition_point(|&boundary| boundary < b);

        self.boundaries
            .iter()
            .zip(self.boundaries.iter().skip(1))
            .zip(self.segments.iter())
            .take(last)
            .skip(first)
            .filter(|((start, end), _)| **start < b && a < **end)
            .flat_map(|(_, tags)| tags.iter().cloned())
            .collect()
    }

    /// Tags covering the `index`th elementary segment
    pub fn segment(&self, index: usize) -> Option<&BTreeSet<T>> {
        self.segments.get(index)
    }

    /// Covering sets of a run of consecutive elementary segments.
    /// Out of range runs are empty.
    pub fn segments(&self, range: Range<usize>) -> &[BTreeSet<T>] {
        self.segments.get(range).unwrap_or(&[])
    }

    pub fn boundaries(&self) -> &[N] {
        &self.boundaries
    }

    /// Number of elementary segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Index of `point` among `boundaries`. Always exact for points taken from the
/// intervals the boundaries were extracted from.
fn position<N: TimePoint>(boundaries: &[N], point: N) -> usize {
    boundaries
        .binary_search(&point)
        .unwrap_or_else(|insert_at| insert_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags<'a>(store: &IntervalStore<u32, &'a str>, a: u32, b: u32) -> Vec<&'a str> {
        store.covering_tags(a, b).into_iter().collect()
    }

    #[test]
    fn empty_store() {
        let store = IntervalStore::<u32, &str>::from_intervals(&[]).unwrap();

        assert!(store.is_empty());
        assert!(store.boundaries().is_empty());
        assert!(store.covering_tags(0, 100).is_empty());
        assert!(store.segment(0).is_none());
    }

    #[test]
    fn rejects_empty_interval() {
        let result = IntervalStore::from_intervals(&[
            WeightedInterval::new(1_u32, 4, "good"),
            WeightedInterval::new(5, 5, "bad"),
            WeightedInterval::new(7, 6, "worse"),
        ]);

        assert_eq!(
            result.unwrap_err(),
            ScheduleError::InvalidInterval {
                start: 5,
                end: 5,
                tag: "bad"
            }
        );
    }

    #[test]
    fn gaps_have_no_coverage() {
        let store = IntervalStore::from_intervals(&[
            WeightedInterval::new(8_u32, 9, "user3"),
            WeightedInterval::new(10, 12, "user3"),
        ])
        .unwrap();

        assert_eq!(store.boundaries(), &[8, 9, 10, 12]);
        assert_eq!(tags(&store, 8, 9), vec!["user3"]);
        assert!(tags(&store, 9, 10).is_empty());
        assert_eq!(tags(&store, 10, 12), vec!["user3"]);
    }

    #[test]
    fn overlapping_intervals_of_one_tag() {
        let store = IntervalStore::from_intervals(&[
            WeightedInterval::new(0_u32, 10, "a"),
            WeightedInterval::new(5, 15, "a"),
            WeightedInterval::new(10, 20, "b"),
        ])
        .unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(tags(&store, 0, 5), vec!["a"]);
        assert_eq!(tags(&store, 5, 10), vec!["a"]);
        assert_eq!(tags(&store, 10, 15), vec!["a", "b"]);
        assert_eq!(tags(&store, 15, 20), vec!["b"]);
    }

    #[test]
    fn abutting_intervals_stay_covered() {
        let store = IntervalStore::from_intervals(&[
            WeightedInterval::new(0_u32, 5, "a"),
            WeightedInterval::new(5, 10, "a"),
        ])
        .unwrap();

        assert_eq!(store.segments(0..2).len(), 2);
        assert!(store.segments(0..2).iter().all(|tags| tags.contains("a")));
    }

    #[test]
    fn wide_ranges_take_the_union() {
        let store = IntervalStore::from_intervals(&[
            WeightedInterval::new(0_u32, 2, "a"),
            WeightedInterval::new(4, 6, "b"),
            WeightedInterval::new(8, 10, "c"),
        ])
        .unwrap();

        assert_eq!(tags(&store, 1, 5), vec!["a", "b"]);
        assert_eq!(tags(&store, 2, 4), Vec::<&str>::new());
        assert_eq!(tags(&store, 0, 100), vec!["a", "b", "c"]);
        assert_eq!(tags(&store, 6, 8), Vec::<&str>::new());
        assert!(tags(&store, 5, 5).is_empty());
    }

    #[test]
    fn out_of_range_segments() {
        let store = IntervalStore::from_intervals(&[WeightedInterval::new(0_u32, 2, "a")]).unwrap();

        assert!(store.segments(3..5).is_empty());
        assert!(store.segment(1).is_none());
    }
}
