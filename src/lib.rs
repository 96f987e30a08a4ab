pub mod boundary;
pub mod event;
pub mod query;
pub mod scan;
pub mod schedule;
pub mod store;
pub mod time;

pub use event::{Event, SuggestedTime, TimeSlot, Timetable};
pub use query::Query;
pub use schedule::{most_suitable_windows, CandidateWindow, ScheduleError, Scheduler};
pub use store::IntervalStore;
pub use time::{TimePoint, WeightedInterval};
