use crate::query::Query;
use crate::schedule::{CandidateWindow, ScheduleError, Scheduler};
use crate::time::{TimePoint, WeightedInterval};
use core::fmt::Debug;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Single time slot which suits a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSlot<N> {
    pub start: N,
    pub end: N,
}

impl<N> TimeSlot<N> {
    pub fn new(start: N, end: N) -> TimeSlot<N> {
        TimeSlot { start, end }
    }
}

/// A participant and every time slot that suits them
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "N: Deserialize<'de>, T: Deserialize<'de>"))
)]
pub struct Timetable<N, T> {
    pub participant: T,
    #[cfg_attr(feature = "serde", serde(rename = "timeSlots", default))]
    pub time_slots: Vec<TimeSlot<N>>,
}

impl<N, T> Timetable<N, T> {
    pub fn new(participant: T, time_slots: Vec<TimeSlot<N>>) -> Timetable<N, T> {
        Timetable {
            participant,
            time_slots,
        }
    }
}

/// Event for which we are looking for the most suitable time.
///
/// `[start, end)` frames the period under consideration: time slots are clipped
/// to it and slots outside of it are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "N: Serialize, N::Span: Serialize, T: Serialize",
        deserialize = "N: Deserialize<'de>, N::Span: Deserialize<'de>, T: Deserialize<'de>"
    ))
)]
pub struct Event<N, T>
where
    N: TimePoint,
{
    pub name: String,
    pub start: N,
    pub end: N,
    pub duration: N::Span,
    #[cfg_attr(feature = "serde", serde(default))]
    pub timetables: Vec<Timetable<N, T>>,
}

/// A suggested time, ready to be handed to whoever presents it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SuggestedTime<N, T> {
    pub start: N,
    pub end: N,
    pub participants: Vec<T>,
}

impl<N, T> From<CandidateWindow<N, T>> for SuggestedTime<N, T> {
    fn from(window: CandidateWindow<N, T>) -> Self {
        SuggestedTime {
            start: window.start,
            end: window.end,
            participants: window.participants,
        }
    }
}

impl<N, T> Event<N, T>
where
    N: TimePoint,
    T: Ord + Clone + Debug + Send + Sync,
{
    pub fn new(name: &str, start: N, end: N, duration: N::Span) -> Event<N, T> {
        Event {
            name: name.to_string(),
            start,
            end,
            duration,
            timetables: vec![],
        }
    }

    pub fn add_timetable(&mut self, timetable: Timetable<N, T>) {
        self.timetables.push(timetable);
    }

    /// # Errors
    /// `ScheduleError::InvalidEvent` when the frame does not end after it starts,
    /// `ScheduleError::InvalidDuration` when the duration is not positive.
    pub fn validate(&self) -> Result<(), ScheduleError<N, T>> {
        if self.end <= self.start {
            return Err(ScheduleError::InvalidEvent {
                start: self.start,
                end: self.end,
            });
        }

        Query::new(self.duration).validate()
    }

    /// Flattens the timetables into intervals tagged by participant, clipped to
    /// the event frame.
    ///
    /// Malformed slots (`start >= end`) are passed through untouched so that the
    /// `IntervalStore` reports them instead of them silently disappearing.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::event::{Event, TimeSlot, Timetable};
    /// use kairos_libs::time::WeightedInterval;
    ///
    /// let mut event = Event::new("Standup", 8_u32, 18, 1);
    /// event.add_timetable(Timetable::new(
    ///     "ann",
    ///     vec![TimeSlot::new(6, 9), TimeSlot::new(12, 13), TimeSlot::new(19, 20)],
    /// ));
    ///
    /// assert_eq!(
    ///     event.intervals(),
    ///     vec![
    ///         WeightedInterval::new(8, 9, "ann"),
    ///         WeightedInterval::new(12, 13, "ann"),
    ///     ]
    /// );
    /// ```
    pub fn intervals(&self) -> Vec<WeightedInterval<N, T>> {
        self.timetables
            .iter()
            .flat_map(|timetable| {
                timetable.time_slots.iter().filter_map(move |slot| {
                    if slot.start >= slot.end {
                        return Some(WeightedInterval::new(
                            slot.start,
                            slot.end,
                            timetable.participant.clone(),
                        ));
                    }

                    let start = slot.start.max(self.start);
                    let end = slot.end.min(self.end);
                    if start < end {
                        Some(WeightedInterval::new(
                            start,
                            end,
                            timetable.participant.clone(),
                        ))
                    } else {
                        None
                    }
                })
            })
            .collect()
    }

    /// Most suitable times for this event, by number of participants, using the
    /// event's own duration.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::event::{Event, TimeSlot, Timetable};
    ///
    /// let mut event = Event::new("Retro", 0_u32, 100, 10);
    /// event.add_timetable(Timetable::new("ann", vec![TimeSlot::new(0, 40)]));
    /// event.add_timetable(Timetable::new("bob", vec![TimeSlot::new(30, 60)]));
    ///
    /// let suggested = event.suggest(Some(1)).unwrap();
    ///
    /// assert_eq!((suggested[0].start, suggested[0].end), (30, 40));
    /// assert_eq!(suggested[0].participants, vec!["ann", "bob"]);
    /// ```
    pub fn suggest(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<SuggestedTime<N, T>>, ScheduleError<N, T>> {
        let scheduler = Scheduler::from_event(self)?;
        let windows = scheduler.query(&Query {
            duration: self.duration,
            limit,
        })?;

        debug!("{} suggested times for event {:?}", windows.len(), self.name);

        Ok(windows.into_iter().map(SuggestedTime::from).collect())
    }
}

impl<N, T> Scheduler<N, T>
where
    N: TimePoint,
    T: Ord + Clone + Debug + Send + Sync,
{
    /// Builds a scheduler from every timetable of `event`.
    pub fn from_event(event: &Event<N, T>) -> Result<Scheduler<N, T>, ScheduleError<N, T>> {
        event.validate()?;
        Scheduler::new(&event.intervals())
    }
}
