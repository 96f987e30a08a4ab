use crate::query::Query;
use crate::scan::{WindowScan, Windowed};
use crate::store::IntervalStore;
use crate::time::{TimePoint, WeightedInterval};
use core::fmt::Debug;
use log::{debug, trace};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "N: Serialize, N::Span: Serialize, T: Serialize"))
)]
pub enum ScheduleError<N, T>
where
    N: TimePoint,
    T: Debug,
{
    #[error("Duration must be positive, got {duration:?}")]
    InvalidDuration { duration: N::Span },
    #[error("Invalid interval for {tag:?}: [{start:?}, {end:?}) does not end after it starts")]
    InvalidInterval { start: N, end: N, tag: T },
    #[error("Invalid event: [{start:?}, {end:?}) does not end after it starts")]
    InvalidEvent { start: N, end: N },
}

/// A window of at least the requested duration and everyone free for all of it.
///
/// `participants` is sorted and may be empty: nobody being free is still a
/// valid answer for that slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateWindow<N, T> {
    pub start: N,
    pub end: N,
    pub participants: Vec<T>,
}

impl<N, T> CandidateWindow<N, T>
where
    N: TimePoint,
{
    pub fn length(&self) -> N::Span {
        self.end.since(self.start)
    }
}

/// Availability-aggregation engine over one collection of intervals.
///
/// Holds nothing but the `IntervalStore` built from the caller's intervals, so
/// independent schedulers share no state and every query is a pure function of
/// the intervals and the `Query`.
#[derive(Debug, Clone)]
pub struct Scheduler<N, T> {
    store: IntervalStore<N, T>,
}

impl<N, T> Scheduler<N, T>
where
    N: TimePoint,
    T: Ord + Clone + Debug + Send + Sync,
{
    /// # Errors
    /// `ScheduleError::InvalidInterval` naming the first interval with
    /// `start >= end`.
    pub fn new(
        intervals: &[WeightedInterval<N, T>],
    ) -> Result<Scheduler<N, T>, ScheduleError<N, T>> {
        Ok(Scheduler {
            store: IntervalStore::from_intervals(intervals)?,
        })
    }

    pub fn store(&self) -> &IntervalStore<N, T> {
        &self.store
    }

    /// Windows of at least `duration`, the most attended first, no more than
    /// `limit` of them (`None` or `Some(0)` for all).
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::schedule::Scheduler;
    /// use kairos_libs::time::WeightedInterval;
    ///
    /// let scheduler = Scheduler::new(&[
    ///     WeightedInterval::new(0_u32, 4, "ann"),
    ///     WeightedInterval::new(2, 6, "bob"),
    /// ])
    /// .unwrap();
    ///
    /// let windows = scheduler.most_suitable_windows(2, Some(1)).unwrap();
    ///
    /// assert_eq!(windows.len(), 1);
    /// assert_eq!((windows[0].start, windows[0].end), (2, 4));
    /// assert_eq!(windows[0].participants, vec!["ann", "bob"]);
    /// ```
    ///
    /// # Errors
    /// `ScheduleError::InvalidDuration` when `duration` is not positive, before
    /// anything is scanned.
    /// ```
    /// use kairos_libs::schedule::{ScheduleError, Scheduler};
    /// use kairos_libs::time::WeightedInterval;
    ///
    /// let scheduler = Scheduler::new(&[WeightedInterval::new(0_i32, 4, "ann")]).unwrap();
    ///
    /// assert_eq!(
    ///     scheduler.most_suitable_windows(0, None),
    ///     Err(ScheduleError::InvalidDuration { duration: 0 })
    /// );
    /// ```
    pub fn most_suitable_windows(
        &self,
        duration: N::Span,
        limit: Option<usize>,
    ) -> Result<Vec<CandidateWindow<N, T>>, ScheduleError<N, T>> {
        self.query(&Query { duration, limit })
    }

    pub fn query(
        &self,
        query: &Query<N::Span>,
    ) -> Result<Vec<CandidateWindow<N, T>>, ScheduleError<N, T>> {
        query.validate::<N, T>()?;

        let boundaries = self.store.boundaries();
        if boundaries.len() < 2 {
            debug!("no availability data, nothing to schedule");
            return Ok(vec![]);
        }

        let mut candidates = self.resolve_all(boundaries.windowed(query.duration));
        let found = candidates.len();

        // Stable: equal counts keep ascending start order
        candidates.sort_by_key(|candidate| Reverse(candidate.participants.len()));

        if let Some(limit) = query.limit() {
            candidates.truncate(limit);
        }

        debug!(
            "found {} windows of at least {:?}, returning {}",
            found,
            query.duration,
            candidates.len()
        );

        Ok(candidates)
    }

    #[cfg(not(feature = "rayon"))]
    fn resolve_all(&self, windows: WindowScan<'_, N>) -> Vec<CandidateWindow<N, T>> {
        windows.filter_map(|window| self.resolve(window)).collect()
    }

    #[cfg(feature = "rayon")]
    fn resolve_all(&self, windows: WindowScan<'_, N>) -> Vec<CandidateWindow<N, T>> {
        let windows: Vec<(usize, usize)> = windows.collect();
        windows
            .into_par_iter()
            .filter_map(|window| self.resolve(window))
            .collect()
    }

    /// Participants covering every elementary segment of `[left, right)`
    fn resolve(&self, (left, right): (usize, usize)) -> Option<CandidateWindow<N, T>> {
        let boundaries = self.store.boundaries();
        let start = *boundaries.get(left)?;
        let end = *boundaries.get(right)?;

        let mut segments = self.store.segments(left..right).iter();
        let mut participants: BTreeSet<&T> = segments.next()?.iter().collect();
        for covering in segments {
            if participants.is_empty() {
                break;
            }
            participants.retain(|tag| covering.contains(*tag));
        }

        trace!(
            "window [{:?}, {:?}) has {} participants",
            start,
            end,
            participants.len()
        );

        Some(CandidateWindow {
            start,
            end,
            participants: participants.into_iter().cloned().collect(),
        })
    }
}

/// One-shot query: builds a `Scheduler` over `intervals` and ranks the windows
/// of at least `duration`.
pub fn most_suitable_windows<N, T>(
    intervals: &[WeightedInterval<N, T>],
    duration: N::Span,
    limit: Option<usize>,
) -> Result<Vec<CandidateWindow<N, T>>, ScheduleError<N, T>>
where
    N: TimePoint,
    T: Ord + Clone + Debug + Send + Sync,
{
    Scheduler::new(intervals)?.most_suitable_windows(duration, limit)
}
