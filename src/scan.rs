use crate::time::TimePoint;
use std::iter::FusedIterator;

/// Two-pointer sweep over strictly increasing boundaries.
///
/// Yields `(left, right)` index pairs: for each left boundary, the earliest right
/// boundary with `boundaries[right] - boundaries[left] >= duration`. `right` never
/// moves backwards, so the whole sweep is linear in the number of boundaries.
///
/// The sweep stops for good the first time no right boundary is far enough away:
/// every later left boundary can only reach a shorter span.
#[derive(Debug, Clone)]
pub struct WindowScan<'a, N>
where
    N: TimePoint,
{
    boundaries: &'a [N],
    duration: N::Span,
    left: usize,
    right: usize,
    done: bool,
}

impl<'a, N> WindowScan<'a, N>
where
    N: TimePoint,
{
    pub fn new(boundaries: &'a [N], duration: N::Span) -> WindowScan<'a, N> {
        WindowScan {
            boundaries,
            duration,
            left: 0,
            right: 1,
            done: false,
        }
    }
}

impl<'a, N> Iterator for WindowScan<'a, N>
where
    N: TimePoint,
{
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = match self.boundaries.get(self.left) {
            Some(&start) => start,
            None => {
                self.done = true;
                return None;
            }
        };

        // A window never collapses to a single boundary
        self.right = self.right.max(self.left + 1);

        while let Some(&end) = self.boundaries.get(self.right) {
            if end.since(start) >= self.duration {
                let window = (self.left, self.right);
                self.left += 1;
                return Some(window);
            }
            self.right += 1;
        }

        self.done = true;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(self.boundaries.len().saturating_sub(self.left + 1)))
        }
    }
}

impl<'a, N> FusedIterator for WindowScan<'a, N> where N: TimePoint {}

pub trait Windowed<N>
where
    N: TimePoint,
{
    fn windowed(&self, duration: N::Span) -> WindowScan<'_, N>;
}

impl<N> Windowed<N> for [N]
where
    N: TimePoint,
{
    /// Scans sorted, de-duplicated boundaries for the shortest windows of at least
    /// `duration`, one per left boundary.
    ///
    /// # Example
    /// ```
    /// use kairos_libs::scan::Windowed;
    ///
    /// let boundaries = [8_u32, 9, 10, 11, 12, 13, 14, 15, 16, 17, 19, 20, 21];
    ///
    /// assert_eq!(
    ///     boundaries.windowed(2).take(3).collect::<Vec<_>>(),
    ///     vec![(0, 2), (1, 3), (2, 4)]
    /// );
    ///
    /// // 16 -> 19 is the first reach of two hours from 16, and 20 cannot reach 22
    /// assert_eq!(
    ///     boundaries.windowed(2).skip(8).collect::<Vec<_>>(),
    ///     vec![(8, 10), (9, 10), (10, 12)]
    /// );
    /// ```
    fn windowed(&self, duration: N::Span) -> WindowScan<'_, N> {
        WindowScan::new(self, duration)
    }
}
