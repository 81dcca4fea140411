use crate::utils::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    SumFilteredScaled,
    SortAscending,
    SortDescending,
    MinByAge,
    MinOfEmpty,
    GroupAndCount,
    Descending,
    LazyFindFirst,
    TimedRange,
    TimedRangeFiltered,
}

impl Scenario {
    pub const ALL: [Scenario; 10] = [
        Scenario::SumFilteredScaled,
        Scenario::SortAscending,
        Scenario::SortDescending,
        Scenario::MinByAge,
        Scenario::MinOfEmpty,
        Scenario::GroupAndCount,
        Scenario::Descending,
        Scenario::LazyFindFirst,
        Scenario::TimedRange,
        Scenario::TimedRangeFiltered,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::SumFilteredScaled => "sum-filtered-scaled",
            Scenario::SortAscending => "sort-ascending",
            Scenario::SortDescending => "sort-descending",
            Scenario::MinByAge => "min-by-age",
            Scenario::MinOfEmpty => "min-of-empty",
            Scenario::GroupAndCount => "group-and-count",
            Scenario::Descending => "descending",
            Scenario::LazyFindFirst => "lazy-find-first",
            Scenario::TimedRange => "timed-range",
            Scenario::TimedRangeFiltered => "timed-range-filtered",
        }
    }

    /// Timing scenarios only report durations, they never fail on results.
    pub fn is_timing(&self) -> bool {
        matches!(self, Scenario::TimedRange | Scenario::TimedRangeFiltered)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.name() == s.trim())
            .ok_or_else(|| HarnessError::UnknownScenario {
                name: s.to_string(),
            })
    }
}
