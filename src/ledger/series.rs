//! Year-keyed amount series and re-keying between timeline windows

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A contiguous run of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub start: i32,
    pub len: u32,
}

impl YearWindow {
    pub fn new(start: i32, len: u32) -> Self {
        Self { start, len }
    }

    /// Window covering `start..end` (empty when end <= start)
    pub fn spanning(start: i32, end: i32) -> Self {
        Self {
            start,
            len: (end - start).max(0) as u32,
        }
    }

    /// First year past the window
    pub fn end(&self) -> i32 {
        self.start + self.len as i32
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year < self.end()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..self.end()
    }
}

/// Amounts keyed by absolute calendar year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearSeries(BTreeMap<i32, f64>);

impl YearSeries {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Every year of the window set to `value`
    pub fn filled(window: YearWindow, value: f64) -> Self {
        Self(window.years().map(|y| (y, value)).collect())
    }

    /// Fit `amounts` onto a window: years outside are dropped, missing years are zero
    pub fn fitted<I>(window: YearWindow, amounts: I) -> Self
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let mut series = Self::filled(window, 0.0);
        for (year, amount) in amounts {
            if window.contains(year) {
                series.0.insert(year, amount);
            } else {
                log::debug!("dropping amount {} for {} outside {:?}", amount, year, window);
            }
        }
        series
    }

    /// Amount for a year (0 when absent)
    pub fn get(&self, year: i32) -> f64 {
        self.0.get(&year).copied().unwrap_or(0.0)
    }

    /// Functional update of a single year
    pub fn with_amount(&self, year: i32, amount: f64) -> Self {
        let mut map = self.0.clone();
        map.insert(year, amount);
        Self(map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.0.iter().map(|(&y, &a)| (y, a))
    }

    pub fn years(&self) -> Vec<i32> {
        self.0.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Sum over the years of a window only
    pub fn total_within(&self, window: YearWindow) -> f64 {
        self.0.range(window.start..window.end()).map(|(_, a)| a).sum()
    }

    /// Move amounts to a new window, keeping each amount at the same offset from its anchor.
    ///
    /// A year `y` in the new window takes the amount stored at
    /// `old_anchor + (y - new_anchor)` if that year lies in the old window, else 0.
    /// Anchors are the project start years, so pre-project years sit at negative offsets.
    /// Returns the re-keyed series and the total of non-zero amounts that fell outside.
    pub fn rekeyed(
        &self,
        old_window: YearWindow,
        old_anchor: i32,
        new_window: YearWindow,
        new_anchor: i32,
    ) -> (YearSeries, f64) {
        let shift = new_anchor - old_anchor;

        let map = new_window
            .years()
            .map(|year| {
                let old_year = year - shift;
                let amount = if old_window.contains(old_year) { self.get(old_year) } else { 0.0 };
                (year, amount)
            })
            .collect();

        let dropped: f64 = old_window
            .years()
            .filter(|&old_year| !new_window.contains(old_year + shift))
            .map(|old_year| self.get(old_year))
            .sum();

        (YearSeries(map), dropped)
    }
}

impl FromIterator<(i32, f64)> for YearSeries {
    fn from_iter<T: IntoIterator<Item = (i32, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
