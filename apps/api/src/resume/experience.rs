//! Experience duration. Accumulates months from date ranges in the
//! `EXPERIENCE` segment.
//!
//! Intervals are sorted by start month and then summed independently. Overlapping
//! roles are NOT merged: two concurrent jobs both count in full. Callers that
//! want a true interval union must not rely on this function.

use chrono::{Datelike, Utc};
use regex::Regex;

use crate::resume::rules::ExtractionRules;
use crate::resume::segments::SegmentMap;

pub const EXPERIENCE_SEGMENT: &str = "EXPERIENCE";

/// `year * 12 + month` (month 1–12).
pub type MonthIndex = i32;

pub fn month_index(year: i32, month: u32) -> MonthIndex {
    year * 12 + month as i32
}

/// Month index of the current UTC month. Used as "Present" unless configured.
pub fn current_month_index() -> MonthIndex {
    let today = Utc::now().date_naive();
    month_index(today.year(), today.month())
}

/// A start/end pair of month indices. `end` may precede `start` in bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: MonthIndex,
    pub end: MonthIndex,
}

impl DateInterval {
    /// Non-positive spans contribute nothing.
    pub fn months(&self) -> i32 {
        self.end.saturating_sub(self.start).max(0)
    }
}

fn month_number(token: &str) -> Option<u32> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
    let n = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Parses "Jan 2020", "September 2019" or "present".
fn parse_boundary(raw: &str, present: MonthIndex) -> Option<MonthIndex> {
    if raw.eq_ignore_ascii_case("present") {
        return Some(present);
    }
    let mut parts = raw.split_whitespace();
    let month = month_number(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(month_index(year, month))
}

/// Collects one interval per non-bullet line that carries a date range.
pub fn collect_intervals(lines: &[&str], pattern: &Regex, present: MonthIndex) -> Vec<DateInterval> {
    lines
        .iter()
        .filter(|line| !line.starts_with('•') && !line.starts_with('-'))
        .filter_map(|line| {
            let caps = pattern.captures(line)?;
            let start = parse_boundary(caps.get(1)?.as_str(), present)?;
            let end = parse_boundary(caps.get(2)?.as_str(), present)?;
            Some(DateInterval { start, end })
        })
        .collect()
}

/// Sorts by start month, then sums each interval's clamped duration.
/// Saturates at `i32::MAX`.
pub fn total_months(intervals: &mut [DateInterval]) -> i32 {
    intervals.sort_by_key(|i| i.start);
    intervals
        .iter()
        .map(DateInterval::months)
        .fold(0i32, i32::saturating_add)
}

/// Years of experience, or `None` when nothing could be measured.
///
/// The `EXPERIENCE` segment date ranges are authoritative. When they yield no
/// months, an explicit "N years of experience" phrase anywhere in `text` is used.
pub fn years_of_experience(
    text: &str,
    segments: &SegmentMap<'_>,
    rules: &ExtractionRules,
    present: MonthIndex,
) -> Option<u32> {
    let months = segments
        .get(EXPERIENCE_SEGMENT)
        .map(|lines| {
            let mut intervals = collect_intervals(lines, &rules.date_range, present);
            total_months(&mut intervals)
        })
        .unwrap_or(0);

    if months > 0 {
        return Some((months / 12) as u32);
    }

    rules
        .years_phrase
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::segments::{segment_lines, split_lines};

    fn may_2025() -> MonthIndex {
        month_index(2025, 5)
    }

    #[test]
    fn test_month_index() {
        assert_eq!(month_index(2020, 1), 24241);
    }

    #[test]
    fn test_parse_boundary_variants() {
        let p = may_2025();
        assert_eq!(parse_boundary("Jan 2020", p), Some(month_index(2020, 1)));
        assert_eq!(parse_boundary("SEPTEMBER 2019", p), Some(month_index(2019, 9)));
        assert_eq!(parse_boundary("Present", p), Some(p));
        assert_eq!(parse_boundary("Smarch 2020", p), None);
    }

    #[test]
    fn test_two_ranges_sum_to_75_months() {
        let rules = ExtractionRules::new().unwrap();
        let lines = vec!["Jan 2019 - Jan 2020", "Feb 2020 - Present"];
        let mut intervals = collect_intervals(&lines, &rules.date_range, may_2025());
        assert_eq!(intervals.len(), 2);
        assert_eq!(total_months(&mut intervals), 12 + 63);
    }

    #[test]
    fn test_overlapping_roles_are_double_counted() {
        let rules = ExtractionRules::new().unwrap();
        let lines = vec!["Jan 2020 - Jan 2022", "Jan 2021 - Jan 2022"];
        let mut intervals = collect_intervals(&lines, &rules.date_range, may_2025());
        // Union would be 24; the sort-then-sum rule counts both spans.
        assert_eq!(total_months(&mut intervals), 36);
    }

    #[test]
    fn test_reversed_interval_contributes_zero() {
        let i = DateInterval {
            start: month_index(2022, 1),
            end: month_index(2020, 1),
        };
        assert_eq!(i.months(), 0);
    }

    #[test]
    fn test_bullet_lines_are_skipped() {
        let rules = ExtractionRules::new().unwrap();
        let lines = vec!["- Jan 2019 - Jan 2020", "• Feb 2020 - Present"];
        assert!(collect_intervals(&lines, &rules.date_range, may_2025()).is_empty());
    }

    #[test]
    fn test_sorting_by_start() {
        let mut intervals = vec![
            DateInterval { start: 30, end: 40 },
            DateInterval { start: 10, end: 20 },
        ];
        assert_eq!(total_months(&mut intervals), 20);
        assert_eq!(intervals[0].start, 10);
    }

    #[test]
    fn test_years_from_experience_segment() {
        let rules = ExtractionRules::new().unwrap();
        let text = "Jane Doe\nEXPERIENCE\nBackend Engineer\nJan 2019 - Jan 2020\nFeb 2020 - Present";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(years_of_experience(text, &segments, &rules, may_2025()), Some(6));
    }

    #[test]
    fn test_no_intervals_is_unknown_not_zero() {
        let rules = ExtractionRules::new().unwrap();
        let text = "Jane Doe\nEXPERIENCE\nBackend Engineer at Acme";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(years_of_experience(text, &segments, &rules, may_2025()), None);
    }

    #[test]
    fn test_short_tenure_reports_zero_years() {
        let rules = ExtractionRules::new().unwrap();
        let text = "EXPERIENCE\nJan 2025 - Apr 2025";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(years_of_experience(text, &segments, &rules, may_2025()), Some(0));
    }

    #[test]
    fn test_huge_years_phrase_never_stored_negative() {
        let rules = ExtractionRules::new().unwrap();
        let text = "Jane Doe\nBackend developer with 3000000000 years of experience";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        let fields = crate::resume::ExtractedFields {
            years_exp: years_of_experience(text, &segments, &rules, may_2025()),
            ..Default::default()
        };
        let profile = crate::models::candidate::CandidateProfile::from_extracted(
            fields,
            "Jane".into(),
            text.into(),
        );
        assert!(profile.years_exp.map_or(true, |y| y >= 0));
    }

    #[test]
    fn test_total_months_saturates() {
        let mut intervals = vec![DateInterval { start: 0, end: i32::MAX }; 4];
        assert_eq!(total_months(&mut intervals), i32::MAX);
    }

    #[test]
    fn test_years_phrase_fallback() {
        let rules = ExtractionRules::new().unwrap();
        let text = "Jane Doe\nBackend developer with 7+ years of experience in Go";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(years_of_experience(text, &segments, &rules, may_2025()), Some(7));
    }
}
