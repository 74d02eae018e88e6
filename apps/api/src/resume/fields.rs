//! Field extractors for name, contact details, location and current title.
//!
//! Every extractor is an ordered list of rules evaluated top to bottom; the first
//! rule that produces a value wins and no match is `None`. Nothing here fails.

use serde::{Deserialize, Serialize};

use crate::resume::experience::{years_of_experience, MonthIndex, EXPERIENCE_SEGMENT};
use crate::resume::rules::{ExtractionRules, JOB_TITLE_HINTS};
use crate::resume::segments::{segment_lines, split_lines, SegmentMap};

pub const SUMMARY_SEGMENT: &str = "SUMMARY";

const NAME_WINDOW: usize = 5;
const LOCATION_WINDOW: usize = 10;
const TITLE_WINDOW: usize = 3;
const TITLE_KEYWORDS: &[&str] = &["engineer", "developer", "architect"];
const CONTACT_WORDS: &[&str] = &["resume", "cv", "name", "phone"];

/// Structured candidate profile extracted from resume text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub current_title: Option<String>,
    pub years_exp: Option<u32>,
    pub hard_skills: Vec<String>,
    pub linkedin_url: Option<String>,
}

/// Runs every extractor over `text`. "Present" in date ranges resolves to `present`.
pub fn extract_fields(text: &str, rules: &ExtractionRules, present: MonthIndex) -> ExtractedFields {
    let lines = split_lines(text);
    let segments = segment_lines(&lines, &rules.header);

    let name = extract_name(&lines, rules);
    let location = extract_location(&lines, name.as_deref(), rules);

    ExtractedFields {
        email: first_match(&rules.email, text),
        phone: first_match(&rules.phone, text),
        linkedin_url: first_match(&rules.linkedin, text),
        location,
        current_title: extract_current_title(&lines, &segments, rules),
        years_exp: years_of_experience(text, &segments, rules, present),
        hard_skills: rules.skills.extract(text),
        name,
    }
}

fn first_match(re: &regex::Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, Copy)]
enum NameRule {
    /// Two or more capitalized words, no `@`, no digit.
    CapitalizedWords,
    /// Short line with no `@`, digit or `:`.
    ShortLine,
}

const NAME_RULES: &[NameRule] = &[NameRule::CapitalizedWords, NameRule::ShortLine];

impl NameRule {
    fn accepts(self, line: &str, rules: &ExtractionRules) -> bool {
        let clean = !line.contains('@') && !line.chars().any(|c| c.is_ascii_digit());
        match self {
            NameRule::CapitalizedWords => clean && rules.name_strict.is_match(line),
            NameRule::ShortLine => {
                let len = line.chars().count();
                clean && len > 3 && len < 30 && !line.contains(':')
            }
        }
    }
}

/// Name from the first few lines. The stricter rule is tried on the whole window
/// before the looser one.
pub fn extract_name(lines: &[&str], rules: &ExtractionRules) -> Option<String> {
    let window = &lines[..lines.len().min(NAME_WINDOW)];
    NAME_RULES.iter().find_map(|rule| {
        window
            .iter()
            .find(|line| rule.accepts(line, rules))
            .map(|line| line.to_string())
    })
}

fn is_contact_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains('@')
        || lower.chars().any(|c| c.is_ascii_digit())
        || CONTACT_WORDS.iter().any(|w| lower.contains(w))
}

/// Location from the top of the resume, falling back to a labelled line.
///
/// Patterns are tried in order across the whole window. A match containing the
/// candidate's first name is a name line, not a location, and is skipped.
pub fn extract_location(
    lines: &[&str],
    name: Option<&str>,
    rules: &ExtractionRules,
) -> Option<String> {
    let first_name = name.and_then(|n| n.split_whitespace().next());
    let window: Vec<&str> = lines
        .iter()
        .take(LOCATION_WINDOW)
        .copied()
        .filter(|l| !is_contact_line(l))
        .collect();

    let from_patterns = rules.location_patterns.iter().find_map(|pattern| {
        window.iter().find_map(|line| {
            let candidate = pattern.captures(line)?.get(1)?.as_str().trim();
            match first_name {
                Some(first) if candidate.contains(first) => None,
                _ => Some(candidate.to_string()),
            }
        })
    });

    // Label fallback: the last labelled line wins.
    from_patterns.or_else(|| {
        lines.iter().rev().find_map(|line| {
            let value = rules.location_label.captures(line)?.get(1)?.as_str().trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    })
}

/// Current title, tiered:
/// 1. a role keyword in the first lines of `EXPERIENCE` (text before `-`),
/// 2. otherwise a "... Engineer/Developer/Architect" phrase in `SUMMARY`,
/// 3. any line with a known title and a recent year.
pub fn extract_current_title(
    lines: &[&str],
    segments: &SegmentMap<'_>,
    rules: &ExtractionRules,
) -> Option<String> {
    let sectioned = if let Some(experience) = segments.get(EXPERIENCE_SEGMENT) {
        title_from_experience(experience)
    } else if let Some(summary) = segments.get(SUMMARY_SEGMENT) {
        let joined = summary.join(" ");
        rules
            .summary_title
            .captures(&joined)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    } else {
        None
    };

    sectioned.or_else(|| {
        lines
            .iter()
            .find(|line| {
                JOB_TITLE_HINTS.iter().any(|hint| line.contains(hint))
                    && rules.recent_year.is_match(line)
            })
            .map(|line| line.to_string())
    })
}

fn title_from_experience(lines: &[&str]) -> Option<String> {
    lines.iter().take(TITLE_WINDOW).find_map(|line| {
        let lower = line.to_lowercase();
        if !TITLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return None;
        }
        let title = match line.split_once('-') {
            Some((before, _)) => before.trim(),
            None => line.trim(),
        };
        (!title.is_empty()).then(|| title.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::experience::month_index;

    fn rules() -> ExtractionRules {
        ExtractionRules::new().unwrap()
    }

    fn may_2025() -> MonthIndex {
        month_index(2025, 5)
    }

    const SAMPLE: &str = "John Smith
john@x.com
+91 98765 43210
Pune, India
https://www.linkedin.com/in/johnsmith

SUMMARY
Backend developer building data platforms.

EXPERIENCE
Senior Engineer - Acme Corp
Jan 2020 - Dec 2021
- Built ingestion pipelines in Python and Kafka
Software Engineer - Initech
Jan 2018 - Dec 2019

SKILLS
Python, Rust, PostgreSQL, Docker
";

    #[test]
    fn test_full_pipeline_on_sample() {
        let fields = extract_fields(SAMPLE, &rules(), may_2025());
        assert_eq!(fields.name.as_deref(), Some("John Smith"));
        assert_eq!(fields.email.as_deref(), Some("john@x.com"));
        assert_eq!(fields.phone.as_deref(), Some("+91 98765 43210"));
        assert_eq!(fields.location.as_deref(), Some("Pune, India"));
        assert_eq!(fields.current_title.as_deref(), Some("Senior Engineer"));
        assert_eq!(fields.years_exp, Some(3));
        assert_eq!(
            fields.linkedin_url.as_deref(),
            Some("https://www.linkedin.com/in/johnsmith")
        );
        assert_eq!(
            fields.hard_skills,
            vec!["Docker", "Kafka", "PostgreSQL", "Python", "Rust"]
        );
    }

    #[test]
    fn test_name_and_email_from_minimal_resume() {
        let text = "John Smith\njohn@x.com\nEXPERIENCE\nJan 2020 - Dec 2021\nSenior Engineer";
        let fields = extract_fields(text, &rules(), may_2025());
        assert_eq!(fields.name.as_deref(), Some("John Smith"));
        assert_eq!(fields.email.as_deref(), Some("john@x.com"));
        assert_eq!(fields.years_exp, Some(1));
    }

    #[test]
    fn test_empty_text_yields_all_absent() {
        let fields = extract_fields("", &rules(), may_2025());
        assert_eq!(fields, ExtractedFields::default());
    }

    #[test]
    fn test_strict_name_rule_beats_earlier_short_line() {
        let lines = vec!["Curriculum", "Jane Doe", "jane@x.com"];
        assert_eq!(extract_name(&lines, &rules()).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_short_line_name_fallback() {
        let lines = vec!["jane doe", "jane@x.com"];
        assert_eq!(extract_name(&lines, &rules()).as_deref(), Some("jane doe"));
    }

    #[test]
    fn test_name_rejects_contact_lines() {
        let lines = vec!["Phone: 555", "me@x.com", "123 Main St"];
        assert_eq!(extract_name(&lines, &rules()), None);
    }

    #[test]
    fn test_name_only_scans_first_five_lines() {
        let lines = vec!["a@b.c", "1", "2", "3", "4", "Jane Doe"];
        assert_eq!(extract_name(&lines, &rules()), None);
    }

    #[test]
    fn test_location_city_state_code() {
        let lines = vec!["Jane Doe", "Austin, TX"];
        assert_eq!(
            extract_location(&lines, Some("Jane Doe"), &rules()).as_deref(),
            Some("Austin, TX")
        );
    }

    #[test]
    fn test_location_city_state() {
        let lines = vec!["Jane Doe", "Seattle, Washington"];
        assert_eq!(
            extract_location(&lines, None, &rules()).as_deref(),
            Some("Seattle, Washington")
        );
    }

    #[test]
    fn test_location_trailing_country_wins_pattern_order() {
        let lines = vec!["Jane Doe", "Toronto, Ontario, Canada"];
        // City+Country is tried first and matches the tail of the line.
        assert_eq!(
            extract_location(&lines, None, &rules()).as_deref(),
            Some("Ontario, Canada")
        );
    }

    #[test]
    fn test_location_skips_name_lines() {
        let lines = vec!["Smith, Jane", "Denver, CO"];
        assert_eq!(
            extract_location(&lines, Some("Jane Smith"), &rules()).as_deref(),
            Some("Denver, CO")
        );
    }

    #[test]
    fn test_location_skips_contact_lines() {
        let lines = vec!["Resume of Austin, TX", "Call 555, TX"];
        assert_eq!(extract_location(&lines, None, &rules()), None);
    }

    #[test]
    fn test_location_label_fallback() {
        let lines = vec!["Jane Doe", "Senior Designer", "Location: Lisbon"];
        assert_eq!(
            extract_location(&lines, Some("Jane Doe"), &rules()).as_deref(),
            Some("Lisbon")
        );
    }

    #[test]
    fn test_location_label_last_line_wins() {
        let lines = vec![
            "Jane Doe",
            "Location: Lisbon",
            "Projects",
            "Based in Porto",
        ];
        assert_eq!(
            extract_location(&lines, Some("Jane Doe"), &rules()).as_deref(),
            Some("Porto")
        );
    }

    #[test]
    fn test_location_label_needs_word_start() {
        let lines = vec!["Jane Doe", "Built cloud-based infrastructure"];
        assert_eq!(extract_location(&lines, Some("Jane Doe"), &rules()), None);
    }

    #[test]
    fn test_title_from_summary_when_no_experience() {
        let rules = rules();
        let text = "Jane Doe\nSUMMARY\nAs a Senior Backend Engineer I build APIs.";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(
            extract_current_title(&lines, &segments, &rules).as_deref(),
            Some("Senior Backend Engineer")
        );
    }

    #[test]
    fn test_title_experience_line_without_hyphen() {
        let rules = rules();
        let text = "EXPERIENCE\nAcme Corp\nLead Developer";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(
            extract_current_title(&lines, &segments, &rules).as_deref(),
            Some("Lead Developer")
        );
    }

    #[test]
    fn test_title_year_fallback() {
        let rules = rules();
        let text = "Jane Doe\nProduct Manager, Globex (2019 - present)";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(
            extract_current_title(&lines, &segments, &rules).as_deref(),
            Some("Product Manager, Globex (2019 - present)")
        );
    }

    #[test]
    fn test_title_absent() {
        let rules = rules();
        let text = "Jane Doe\nEXPERIENCE\nAcme Corp\nSales";
        let lines = split_lines(text);
        let segments = segment_lines(&lines, &rules.header);
        assert_eq!(extract_current_title(&lines, &segments, &rules), None);
    }
}
