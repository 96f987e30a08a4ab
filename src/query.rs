use crate::schedule::ScheduleError;
use crate::time::TimePoint;
use core::fmt::Debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of one scheduling query.
///
/// `duration` is the minimum length of a window. `limit` caps the number of
/// ranked windows returned. `None` and `Some(0)` both mean unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Query<S> {
    pub duration: S,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limit: Option<usize>,
}

impl<S> Query<S> {
    /// # Examples
    /// ```
    /// use kairos_libs::query::Query;
    ///
    /// let query = Query::new(60).with_limit(3);
    /// assert_eq!(query.limit(), Some(3));
    ///
    /// assert_eq!(Query::new(60).limit(), None);
    /// assert_eq!(Query::new(60).with_limit(0).limit(), None);
    /// ```
    pub fn new(duration: S) -> Query<S> {
        Query {
            duration,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Query<S> {
        self.limit = Some(limit);
        self
    }

    /// Effective limit, with zero folded into unlimited
    pub fn limit(&self) -> Option<usize> {
        self.limit.filter(|&limit| limit > 0)
    }

    /// # Errors
    /// `ScheduleError::InvalidDuration` when the duration is not positive.
    pub fn validate<N, T>(&self) -> Result<(), ScheduleError<N, T>>
    where
        N: TimePoint<Span = S>,
        T: Debug,
        S: Ord + Copy,
    {
        if self.duration <= N::zero_span() {
            return Err(ScheduleError::InvalidDuration {
                duration: self.duration,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_duration_is_valid() {
        assert_eq!(Query::new(1_u32).validate::<u32, &str>(), Ok(()));
        assert_eq!(Query::new(60_i64).with_limit(2).validate::<i64, &str>(), Ok(()));
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        assert_eq!(
            Query::new(0_u32).validate::<u32, &str>(),
            Err(ScheduleError::InvalidDuration { duration: 0 })
        );
        assert_eq!(
            Query::new(-15_i32).validate::<i32, &str>(),
            Err(ScheduleError::InvalidDuration { duration: -15 })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_limit_means_unlimited() {
        let query: Query<u32> = serde_json::from_str(r#"{ "duration": 60 }"#).unwrap();

        assert_eq!(query, Query::new(60));
        assert_eq!(query.limit(), None);
        assert_eq!(
            serde_json::from_str::<Query<u32>>(&serde_json::to_string(&query).unwrap()).unwrap(),
            query
        );
    }
}
