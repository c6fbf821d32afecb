//! Range expressions selecting a subset of event indices.

use std::fmt;

use thiserror::Error;

/// Failure to parse a range expression. Always fatal; never a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range expression contains no fragments")]
    Empty,

    #[error("range fragment '{fragment}' is not numeric")]
    NonNumeric { fragment: String },

    #[error("range fragment '{fragment}' has its end before its start")]
    Reversed { fragment: String },
}

/// A sorted set of disjoint inclusive 1-based intervals over `[1, bound]`.
///
/// Produced from expressions like `"1-50,53-"`: fragments are `a-b`, `a-`,
/// `-b`, or `a`; out-of-range bounds clip to the session bound, overlapping
/// and adjacent intervals merge, and the final set sorts ascending. A
/// fragment whose start exceeds the bound clips to an empty interval, so an
/// expression may validly select nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet {
    intervals: Vec<(usize, usize)>,
    bound: usize,
}

impl RangeSet {
    /// Parses and normalizes a range expression against `bound` events.
    ///
    /// Blank fragments (doubled commas) are skipped; a wholly blank
    /// expression, a non-numeric token, or a reversed `a-b` is a
    /// [`RangeError`].
    pub fn parse(expr: &str, bound: usize) -> Result<Self, RangeError> {
        let mut raw: Vec<(usize, usize)> = Vec::new();
        let mut saw_fragment = false;

        for fragment in expr.split(',') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            saw_fragment = true;

            if let Some(interval) = parse_fragment(fragment, bound)? {
                raw.push(interval);
            }
        }

        if !saw_fragment {
            return Err(RangeError::Empty);
        }

        raw.sort_unstable();
        let mut intervals: Vec<(usize, usize)> = Vec::new();
        for (start, end) in raw {
            match intervals.last_mut() {
                Some((_, last_end)) if start <= *last_end + 1 => {
                    *last_end = (*last_end).max(end);
                }
                _ => intervals.push((start, end)),
            }
        }

        Ok(Self { intervals, bound })
    }

    /// The identity selection `1-bound` (empty for an empty session).
    #[must_use]
    pub fn full(bound: usize) -> Self {
        let intervals = if bound == 0 { Vec::new() } else { vec![(1, bound)] };
        Self { intervals, bound }
    }

    #[must_use]
    pub fn bound(&self) -> usize {
        self.bound
    }

    #[must_use]
    pub fn intervals(&self) -> &[(usize, usize)] {
        &self.intervals
    }

    /// Number of selected indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals
            .iter()
            .map(|(start, end)| end - start + 1)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.intervals
            .iter()
            .any(|(start, end)| (*start..=*end).contains(&index))
    }

    /// Selected 1-based indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.intervals
            .iter()
            .flat_map(|(start, end)| *start..=*end)
    }
}

impl fmt::Display for RangeSet {
    /// Canonical form: re-parsing it against the same bound is idempotent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, (start, end)) in self.intervals.iter().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        Ok(())
    }
}

fn parse_fragment(fragment: &str, bound: usize) -> Result<Option<(usize, usize)>, RangeError> {
    let non_numeric = || RangeError::NonNumeric {
        fragment: fragment.to_string(),
    };

    let (start, end) = match fragment.split_once('-') {
        Some((start_str, end_str)) => {
            let start_str = start_str.trim();
            let end_str = end_str.trim();
            let start = if start_str.is_empty() {
                1
            } else {
                start_str.parse::<usize>().map_err(|_| non_numeric())?
            };
            let end = if end_str.is_empty() {
                bound
            } else {
                end_str.parse::<usize>().map_err(|_| non_numeric())?
            };
            if !start_str.is_empty() && !end_str.is_empty() && end < start {
                return Err(RangeError::Reversed {
                    fragment: fragment.to_string(),
                });
            }
            (start, end)
        }
        None => {
            let index = fragment.parse::<usize>().map_err(|_| non_numeric())?;
            (index, index)
        }
    };

    // Clip to [1, bound]; a start past the bound leaves nothing.
    let start = start.max(1);
    let end = end.min(bound);
    if start > end {
        return Ok(None);
    }
    Ok(Some((start, end)))
}
