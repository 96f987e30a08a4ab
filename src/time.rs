use core::fmt::Debug;
use num::{Bounded, CheckedSub, Zero};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An absolute point on a shared, already timezone-normalized timeline.
///
/// `Span` is the distance between two points. Integers are their own span
/// (seconds, minutes, whatever unit the caller picked), `chrono::DateTime<Utc>`
/// uses `chrono::Duration`.
pub trait TimePoint: Ord + Copy + Debug + Send + Sync {
    type Span: Ord + Copy + Debug + Send + Sync;

    /// Distance from `earlier` to `self`. Never negative for integer points:
    /// a point before `earlier` yields the zero span.
    fn since(self, earlier: Self) -> Self::Span;

    fn zero_span() -> Self::Span;
}

macro_rules! integer_time_point {
    ($($t:ty),*) => {
        $(
            impl TimePoint for $t {
                type Span = $t;

                fn since(self, earlier: Self) -> $t {
                    if self <= earlier {
                        return <$t as Zero>::zero();
                    }
                    // Only signed extremes overflow here, saturate instead.
                    CheckedSub::checked_sub(&self, &earlier)
                        .unwrap_or_else(<$t as Bounded>::max_value)
                }

                fn zero_span() -> $t {
                    <$t as Zero>::zero()
                }
            }
        )*
    };
}

integer_time_point!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(feature = "chrono")]
impl TimePoint for chrono::DateTime<chrono::Utc> {
    type Span = chrono::Duration;

    fn since(self, earlier: Self) -> chrono::Duration {
        self.signed_duration_since(earlier)
    }

    fn zero_span() -> chrono::Duration {
        chrono::Duration::zero()
    }
}

/// Half-open `[start, end)` slice of availability owned by the participant `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct WeightedInterval<N, T> {
    pub start: N,
    pub end: N,
    pub tag: T,
}

impl<N, T> WeightedInterval<N, T>
where
    N: TimePoint,
{
    /// Construct a new interval
    /// No validation happens here, the `IntervalStore` rejects intervals that
    /// do not end after they start.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::time::WeightedInterval;
    ///
    /// let interval = WeightedInterval::new(9_u32, 12, "user1");
    ///
    /// assert!(interval.is_valid());
    /// assert_eq!(interval.length(), 3);
    /// ```
    pub fn new(start: N, end: N, tag: T) -> WeightedInterval<N, T> {
        WeightedInterval { start, end, tag }
    }

    /// Strictly positive duration
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn length(&self) -> N::Span {
        self.end.since(self.start)
    }

    /// True if `[start, end)` lies entirely inside this interval
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::time::WeightedInterval;
    ///
    /// let interval = WeightedInterval::new(9_u32, 12, "user1");
    ///
    /// assert!(interval.covers(9, 12));
    /// assert!(interval.covers(10, 11));
    /// assert!(!interval.covers(11, 13));
    /// ```
    pub fn covers(&self, start: N, end: N) -> bool {
        self.start <= start && end <= self.end
    }

    /// True if this interval shares any part of the half-open range `[start, end)`
    pub fn overlaps(&self, start: N, end: N) -> bool {
        self.start < end && start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_spans_never_go_negative() {
        assert_eq!(5_u32.since(9), 0);
        assert_eq!(9_u32.since(5), 4);
        assert_eq!((-3_i64).since(-10), 7);
    }

    #[test]
    fn integer_spans_saturate() {
        assert_eq!(i8::MAX.since(i8::MIN), i8::MAX);
        assert_eq!(i64::MAX.since(-1), i64::MAX);
    }

    #[test]
    fn overlap_is_half_open() {
        let interval = WeightedInterval::new(9_u32, 12, 'a');

        assert!(interval.overlaps(11, 13));
        assert!(interval.overlaps(8, 10));
        assert!(!interval.overlaps(12, 13));
        assert!(!interval.overlaps(7, 9));
    }

    #[test]
    fn empty_and_reversed_intervals_are_invalid() {
        assert!(!WeightedInterval::new(4_u32, 4, 'a').is_valid());
        assert!(!WeightedInterval::new(5_u32, 4, 'a').is_valid());
        assert_eq!(WeightedInterval::new(5_u32, 4, 'a').length(), 0);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn datetime_spans() {
        use chrono::{Duration, TimeZone, Utc};

        let nine = Utc.with_ymd_and_hms(2000, 1, 1, 9, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();

        assert_eq!(noon.since(nine), Duration::hours(3));
        assert_eq!(WeightedInterval::new(nine, noon, "user1").length(), Duration::hours(3));
    }
}
