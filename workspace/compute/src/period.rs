//! Chronological keys and range filters.
//!
//! A period key is `year * 100 + month`; ordering and range filtering both
//! use this integer space so December of one year sorts before January of
//! the next.

use tracing::debug;

/// Separators accepted between the two bounds of a range, tried in order.
pub const RANGE_SEPARATORS: [&str; 4] = ["..", ":", ",", "_"];

const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

pub fn month_key(year: i32, month: i32) -> i32 {
    year * 100 + month
}

/// Inclusive range of period keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub start: i32,
    pub end: i32,
}

impl Default for PeriodRange {
    fn default() -> Self {
        Self::all()
    }
}

impl PeriodRange {
    /// January of year 0 through December of year 9999.
    pub fn all() -> Self {
        Self {
            start: month_key(MIN_YEAR, 1),
            end: month_key(MAX_YEAR, 12),
        }
    }

    pub fn year(year: i32) -> Self {
        Self {
            start: month_key(year, 1),
            end: month_key(year, 12),
        }
    }

    pub fn month(year: i32, month: i32) -> Self {
        let key = month_key(year, month);
        Self { start: key, end: key }
    }

    pub fn contains(&self, year: i32, month: i32) -> bool {
        let key = month_key(year, month);
        self.start <= key && key <= self.end
    }

    /// True when `(year, month)` comes before the range start.
    pub fn is_before(&self, year: i32, month: i32) -> bool {
        month_key(year, month) < self.start
    }

    pub fn start_year(&self) -> i32 {
        self.start.div_euclid(100)
    }

    pub fn end_year(&self) -> i32 {
        self.end.div_euclid(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

/// Parses a range filter.
///
/// Accepts `2024`, `2024-03`, or two such bounds joined by one of
/// [`RANGE_SEPARATORS`]. A bare year is January as a start bound and
/// December as an end bound. Empty or unreadable bounds widen to the
/// extreme of [`PeriodRange::all`]. A reversed range is kept as-is and
/// matches nothing.
pub fn parse_range(raw: &str) -> PeriodRange {
    let raw = raw.trim();
    let widest = PeriodRange::all();

    let range = match RANGE_SEPARATORS
        .iter()
        .find_map(|separator| raw.split_once(separator))
    {
        Some((start, end)) => PeriodRange {
            start: parse_bound(start, Bound::Start).unwrap_or(widest.start),
            end: parse_bound(end, Bound::End).unwrap_or(widest.end),
        },
        None => match (parse_bound(raw, Bound::Start), parse_bound(raw, Bound::End)) {
            (Some(start), Some(end)) => PeriodRange { start, end },
            _ => widest,
        },
    };

    debug!(raw, start = range.start, end = range.end, "Parsed range");
    range
}

fn parse_bound(text: &str, bound: Bound) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match text.split_once('-') {
        Some((year, month)) => {
            let year = parse_year(year)?;
            let month: i32 = month.trim().parse().ok()?;
            (1..=12).contains(&month).then(|| month_key(year, month))
        }
        None => {
            let year = parse_year(text)?;
            Some(match bound {
                Bound::Start => month_key(year, 1),
                Bound::End => month_key(year, 12),
            })
        }
    }
}

fn parse_year(text: &str) -> Option<i32> {
    let year: i32 = text.trim().parse().ok()?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}
