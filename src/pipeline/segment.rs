//! Header-driven section detection with a paragraph-chunk fallback.
//!
//! Detection is an ordered list of predicate rules evaluated top-to-bottom per
//! line; the first matching rule wins. Documents where no rule fires anywhere
//! fall back to greedy paragraph chunks of roughly 1200 characters.

use regex::Regex;
use std::sync::LazyLock;

/// Title assigned to text preceding the first detected header.
const PREAMBLE_TITLE: &str = "Preamble";
/// A fallback chunk closes at the first paragraph that pushes it past this size.
const FALLBACK_CHUNK_CHARS: usize = 1200;
/// Lines shorter than this are never headers, whatever the rule.
const MIN_HEADER_CHARS: usize = 4;

static ALL_CAPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9 &/\-]+$").expect("valid all-caps regex"));
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}[.)]\s+[A-Z].{2,60}$").expect("valid numbered regex"));

/// Common document-section names matched case-insensitively as exact lines.
const SECTION_VOCABULARY: &[&str] = &[
    "profile summary",
    "summary",
    "experience",
    "work experience",
    "professional experience",
    "projects",
    "education",
    "skills",
    "publications",
    "notable projects",
    "additional details",
];

/// One header-detection rule. Rules are evaluated in [`HEADER_RULES`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// Short all-caps line using only letters, digits, spaces, `&`, `/`, `-`.
    AllCaps,
    /// Numbered heading such as `1. Introduction` or `2) Methods`.
    Numbered,
    /// Case-insensitive exact match against the section-name vocabulary.
    Vocabulary,
}

/// Detection order; earlier rules take priority.
pub const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule::AllCaps,
    HeaderRule::Numbered,
    HeaderRule::Vocabulary,
];

impl HeaderRule {
    fn matches(self, line: &str) -> bool {
        match self {
            Self::AllCaps => {
                line.len() <= 60
                    && ALL_CAPS.is_match(line)
                    && line.chars().any(|c| c.is_ascii_uppercase())
            }
            Self::Numbered => NUMBERED.is_match(line),
            Self::Vocabulary => SECTION_VOCABULARY
                .iter()
                .any(|name| line.eq_ignore_ascii_case(name)),
        }
    }
}

/// Return the first rule that classifies `line` as a header, if any.
pub fn detect_header(line: &str) -> Option<HeaderRule> {
    let stripped = line.trim();
    if stripped.chars().count() < MIN_HEADER_CHARS {
        return None;
    }
    HEADER_RULES
        .iter()
        .copied()
        .find(|rule| rule.matches(stripped))
}

/// A titled contiguous span of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section title as detected, or generated by the fallback chunker.
    pub title: String,
    /// Body text accumulated under the title.
    pub body: String,
}

/// Insertion-ordered mapping from section title to section body.
///
/// Titles are unique: re-inserting a title keeps its original position and
/// replaces the body, so the last occurrence in the document wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<Section>,
}

impl SectionMap {
    /// Number of sections in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no sections have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a section body by exact title.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|section| section.title == title)
            .map(|section| section.body.as_str())
    }

    /// Iterate sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.entries.iter()
    }

    fn insert(&mut self, title: String, body: String) {
        match self.entries.iter_mut().find(|s| s.title == title) {
            Some(existing) => existing.body = body,
            None => self.entries.push(Section { title, body }),
        }
    }
}

impl IntoIterator for SectionMap {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Split cleaned text into titled sections.
///
/// Falls back to [`fallback_chunks`] when header detection produces nothing
/// usable: no rule fired on any line (the map holds only the preamble
/// sentinel), or every detected body is blank.
pub fn segment(text: &str) -> SectionMap {
    let sections = detect_sections(text);
    let found_header = sections.iter().any(|s| s.title != PREAMBLE_TITLE);
    let has_content = sections.iter().any(|s| !s.body.trim().is_empty());
    if found_header && has_content {
        return sections;
    }
    tracing::debug!("No usable headers detected; falling back to paragraph chunks");
    fallback_chunks(text)
}

/// Scan lines in order, flushing the accumulated buffer whenever a header
/// line starts a new section. Text before the first header lands under
/// `"Preamble"`.
fn detect_sections(text: &str) -> SectionMap {
    let mut sections = SectionMap::default();
    let mut buffer: Vec<&str> = Vec::new();
    let mut current_header = PREAMBLE_TITLE.to_string();

    for line in text.lines() {
        if detect_header(line).is_some() {
            if !buffer.is_empty() {
                sections.insert(current_header, buffer.join("\n").trim().to_string());
            }
            current_header = line.trim().to_string();
            buffer = Vec::new();
        } else {
            buffer.push(line);
        }
    }

    if !buffer.is_empty() {
        sections.insert(current_header, buffer.join("\n").trim().to_string());
    }
    sections
}

/// Re-chunk the original text by blank-line-separated paragraphs, greedily
/// packing until a chunk exceeds [`FALLBACK_CHUNK_CHARS`]. Chunks are titled
/// `Section 1`, `Section 2`, ... in order.
fn fallback_chunks(text: &str) -> SectionMap {
    let mut sections = SectionMap::default();
    let mut chunk: Vec<&str> = Vec::new();
    let mut count = 0usize;

    for paragraph in text.split("\n\n") {
        chunk.push(paragraph);
        let size: usize = chunk.iter().map(|p| p.chars().count()).sum();
        if size > FALLBACK_CHUNK_CHARS {
            count += 1;
            sections.insert(
                format!("Section {count}"),
                chunk.join("\n\n").trim().to_string(),
            );
            chunk.clear();
        }
    }
    if !chunk.is_empty() {
        count += 1;
        sections.insert(
            format!("Section {count}"),
            chunk.join("\n\n").trim().to_string(),
        );
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_caps_lines_are_headers() {
        assert_eq!(detect_header("EDUCATION"), Some(HeaderRule::AllCaps));
        assert_eq!(detect_header("  SKILLS & TOOLS  "), Some(HeaderRule::AllCaps));
        assert_eq!(detect_header("R&D"), None); // below minimum length
        assert_eq!(detect_header("NOT A HEADER BECAUSE THIS LINE RUNS FAR PAST THE SIXTY CHARACTER CEILING"), None);
    }

    #[test]
    fn numbered_lines_are_headers() {
        assert_eq!(detect_header("1. Introduction"), Some(HeaderRule::Numbered));
        assert_eq!(detect_header("12) Methods and Materials"), Some(HeaderRule::Numbered));
        assert_eq!(detect_header("1. lowercase start"), None);
        assert_eq!(detect_header("123. Too many digits"), None);
    }

    #[test]
    fn vocabulary_matches_case_insensitively() {
        assert_eq!(detect_header("Work Experience"), Some(HeaderRule::Vocabulary));
        assert_eq!(detect_header("skills"), Some(HeaderRule::Vocabulary));
        assert_eq!(detect_header("skillset"), None);
    }

    #[test]
    fn all_caps_rule_wins_over_vocabulary() {
        // "EXPERIENCE" satisfies both rules; the ordered list reports the first.
        assert_eq!(detect_header("EXPERIENCE"), Some(HeaderRule::AllCaps));
    }

    #[test]
    fn segments_on_detected_headers() {
        let sections = segment("SUMMARY\nBuilt X.\nEDUCATION\nBA in Y.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections.get("SUMMARY"), Some("Built X."));
        assert_eq!(sections.get("EDUCATION"), Some("BA in Y."));
    }

    #[test]
    fn preamble_collects_text_before_first_header() {
        let sections = segment("intro line\nSUMMARY\nBuilt X.");
        assert_eq!(sections.get("Preamble"), Some("intro line"));
        assert_eq!(sections.get("SUMMARY"), Some("Built X."));
    }

    #[test]
    fn repeated_titles_keep_last_body_in_place() {
        let sections = segment("SKILLS\nfirst\nEDUCATION\nBA\nSKILLS\nsecond");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections.get("SKILLS"), Some("second"));
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["SKILLS", "EDUCATION"]);
    }

    #[test]
    fn headerless_text_falls_back_to_chunks() {
        let paragraph = "word ".repeat(100).trim_end().to_string(); // 499 chars
        let text = vec![paragraph; 7].join("\n\n");
        let sections = segment(&text);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        // Chunks close at the first paragraph past 1200 chars: 3 + 3 + 1.
        assert_eq!(titles, vec!["Section 1", "Section 2", "Section 3"]);
        for section in sections.iter() {
            // Greedy packing may overshoot by at most one paragraph.
            assert!(section.body.chars().count() <= FALLBACK_CHUNK_CHARS + 510);
        }
    }

    #[test]
    fn segmentation_preserves_non_header_characters() {
        let text = "SUMMARY\nBuilt X over two years.\nEDUCATION\nBA in Y.\nMinor in Z.";
        let sections = segment(text);
        let rebuilt: String = sections
            .iter()
            .map(|s| s.body.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        let non_header: String = text
            .lines()
            .filter(|line| detect_header(line).is_none())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(normalize(&rebuilt), normalize(&non_header));
    }

    #[test]
    fn blank_bodies_trigger_fallback() {
        let sections = segment("SUMMARY\n\nEDUCATION\n");
        // Header-only input produces no usable bodies; the fallback chunker
        // takes over with positional titles.
        assert!(sections.iter().all(|s| s.title.starts_with("Section ")));
    }
}
