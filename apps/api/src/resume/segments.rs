//! Section segmentation: splits resume lines into named runs between headers.

use regex::Regex;

/// Implicit segment holding every line before the first detected header.
pub const PREAMBLE: &str = "HEADER";

#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub header: &'a str,
    pub lines: Vec<&'a str>,
}

/// Ordered resume segments. Lookups by header return the last segment with that
/// header, so a repeated header shadows the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentMap<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> SegmentMap<'a> {
    pub fn get(&self, header: &str) -> Option<&[&'a str]> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.header == header)
            .map(|s| s.lines.as_slice())
    }
}

#[cfg(test)]
impl<'a> SegmentMap<'a> {
    pub fn contains(&self, header: &str) -> bool {
        self.get(header).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment<'a>> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Trimmed, non-blank lines of `text` in reading order.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Groups `lines` under the most recent header line.
///
/// Header lines are not content. A header with no lines after it produces no
/// segment.
pub fn segment_lines<'a>(lines: &[&'a str], header: &Regex) -> SegmentMap<'a> {
    let mut segments = Vec::new();
    let mut current = Segment {
        header: PREAMBLE,
        lines: Vec::new(),
    };

    for &line in lines {
        if header.is_match(line) {
            let finished = std::mem::replace(
                &mut current,
                Segment {
                    header: line,
                    lines: Vec::new(),
                },
            );
            if !finished.lines.is_empty() {
                segments.push(finished);
            }
        } else {
            current.lines.push(line);
        }
    }
    if !current.lines.is_empty() {
        segments.push(current);
    }

    SegmentMap { segments }
}
