//! Shared arithmetic for the metrics reducers.
//!
//! All rounding is half-up and done in integer space so repeated calls on
//! the same report give bit-identical results.

use crate::report::{Report, ReportEntry};
use crate::status::{StatusCode, StatusCounts};
use crate::Result;
use serde::{Deserialize, Serialize};

/// `round(100 * part / total)`, or 0 for an empty total.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u32
}

/// `sum / total` rounded to one decimal, or 0.0 for an empty total.
pub fn mean_one_decimal(sum: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum = sum as u64;
    let total = total as u64;
    let tenths = (20 * sum + total) / (2 * total);
    tenths as f64 / 10.0
}

/// Mean of a list length across entries.
pub fn mean_len<E>(entries: &[E], len: impl Fn(&E) -> usize) -> f64 {
    let sum = entries.iter().map(len).sum();
    mean_one_decimal(sum, entries.len())
}

/// Conjunction over every tracked dimension. No dimensions means nothing
/// has been tracked, which is not complete.
pub fn is_fully_complete(dimensions: &[(&str, StatusCode)]) -> bool {
    !dimensions.is_empty() && dimensions.iter().all(|(_, status)| status.is_complete())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionTally {
    pub name: String,
    pub counts: StatusCounts,
}

/// Kind-independent reduction of a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    /// Per-dimension tallies in first-seen order
    pub dimensions: Vec<DimensionTally>,
    pub fully_complete: usize,
    pub percent_complete: u32,
}

impl Summary {
    pub fn counts(&self, dimension: &str) -> StatusCounts {
        self.dimensions
            .iter()
            .find(|d| d.name == dimension)
            .map(|d| d.counts)
            .unwrap_or_default()
    }
}

/// Validate the report, then tally its dimensions and count the entries
/// that are complete on every one of them.
pub fn summarize<E: ReportEntry>(report: &Report<E>) -> Result<Summary> {
    report.validate()?;

    let mut dimensions: Vec<DimensionTally> = Vec::new();
    let mut fully_complete = 0;

    for entry in &report.entries {
        let dims = entry.dimensions();
        for (name, status) in &dims {
            match dimensions.iter_mut().find(|d| d.name == *name) {
                Some(tally) => tally.counts.record(*status),
                None => {
                    let mut counts = StatusCounts::default();
                    counts.record(*status);
                    dimensions.push(DimensionTally {
                        name: name.to_string(),
                        counts,
                    });
                }
            }
        }
        if is_fully_complete(&dims) {
            fully_complete += 1;
        }
    }

    let total = report.len();
    Ok(Summary {
        total,
        dimensions,
        fully_complete,
        percent_complete: percent(fully_complete, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 5), 0);
    }

    #[test]
    fn percent_of_empty_is_zero() {
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn percent_is_bounded() {
        assert_eq!(percent(7, 5), 100);
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        assert_eq!(mean_one_decimal(7, 3), 2.3);
        assert_eq!(mean_one_decimal(5, 2), 2.5);
        assert_eq!(mean_one_decimal(1, 4), 0.3); // 0.25
        assert_eq!(mean_one_decimal(0, 0), 0.0);
    }

    #[test]
    fn conjunction_needs_every_dimension() {
        let all = [("a", StatusCode::Complete), ("b", StatusCode::Complete)];
        let one_partial = [("a", StatusCode::Complete), ("b", StatusCode::Partial)];
        assert!(is_fully_complete(&all));
        assert!(!is_fully_complete(&one_partial));
        assert!(!is_fully_complete(&[]));
    }
}
