//! Compiled pattern tables for the field extractors.
//!
//! Built once by `main` and shared read-only through `AppState`. Every extractor
//! receives the rules it needs as an argument; nothing in `resume` compiles a
//! regex on the hot path.

use regex::Regex;

use crate::resume::skills::SkillTable;

/// Countries accepted as the trailing component of a location line.
const COUNTRIES: &str = "India|USA|UK|Canada";

/// Month-name prefix shared by both ends of an experience date range.
const MONTH: &str = "(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*";

/// Substrings that mark a line as a job title in the full-text fallback.
pub const JOB_TITLE_HINTS: &[&str] = &[
    "Software Engineer",
    "Software Developer",
    "Full Stack",
    "Frontend",
    "Backend",
    "DevOps",
    "Data Scientist",
    "Data Engineer",
    "Product Manager",
    "Project Manager",
    "Engineering Manager",
    "CTO",
    "VP",
    "Director",
    "Lead",
    "Architect",
    "Designer",
];

/// All regexes and lookup tables used by the extraction pipeline.
pub struct ExtractionRules {
    /// Section header: a line of only uppercase letters and spaces.
    pub header: Regex,
    pub name_strict: Regex,
    pub email: Regex,
    pub phone: Regex,
    pub linkedin: Regex,
    /// Ordered: City+Country, City+State(+Country), City+StateCode.
    pub location_patterns: Vec<Regex>,
    pub location_label: Regex,
    pub summary_title: Regex,
    pub recent_year: Regex,
    pub date_range: Regex,
    pub years_phrase: Regex,
    pub skills: SkillTable,
}

impl ExtractionRules {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            header: Regex::new(r"^[A-Z\s]{2,}$")?,
            name_strict: Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+$")?,
            email: Regex::new(r"[\w.-]+@[\w.-]+\.\w+")?,
            phone: Regex::new(r"\+?\d[\d\s-]{7,}\d")?,
            linkedin: Regex::new(r"https?://(?:www\.)?linkedin\.com/\S+")?,
            location_patterns: vec![
                Regex::new(&format!(r"([A-Z][a-z]+\s*,\s*(?:{COUNTRIES}))\s*$"))?,
                Regex::new(&format!(
                    r"([A-Z][a-z]+\s*,\s*[A-Z][a-z]+(?:\s*,\s*(?:{COUNTRIES}))?)"
                ))?,
                Regex::new(r"([A-Z][a-z]+\s*,\s*[A-Z]{2})")?,
            ],
            location_label: Regex::new(
                r"(?i)\b(?:location:|address:|city:|based in|residing in)\s*:?\s*(.*)$",
            )?,
            summary_title: Regex::new(
                r"(?:As\s+(?:an?|the)\s+)?([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\s+(?:Engineer|Developer|Architect))",
            )?,
            recent_year: Regex::new(r"20(?:1[5-9]|2[0-9])")?,
            date_range: Regex::new(&format!(
                r"(?i)({MONTH}\s+\d{{4}})\s*(?:-|–|—|to)\s*({MONTH}\s+\d{{4}}|present)"
            ))?,
            years_phrase: Regex::new(r"(?i)(\d+)\+?\s+years?(?:\s+of)?\s+experience")?,
            skills: SkillTable::new()?,
        })
    }
}
