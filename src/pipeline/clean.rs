//! Text normalization applied between extraction and segmentation.
//!
//! Cleaning runs a fixed sequence of passes: horizontal-whitespace collapsing,
//! decorative-glyph removal, a printable-ASCII-plus-Latin-Extended filter,
//! per-page boilerplate-line removal, and newline collapsing. The output is
//! stable under repeated cleaning.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\r\n]+").expect("valid whitespace regex"));
static DECORATIVE_GLYPHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[•▪◦∙●■□◆◇✦✧▶◀►◄\u{25A0}-\u{25FF}\u{2500}-\u{257F}\u{00A0}\u{2022}\u{25CF}\u{25AA}\u{25AB}\u{25E6}]",
    )
    .expect("valid glyph regex")
});
static NON_PRINTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\x09\x0A\x0D\x20-\x7E\u{00A1}-\u{024F}]").expect("valid printable regex")
});
static DOUBLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ ]{2,}").expect("valid space regex"));
static PAGE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n--- Page \d+ ---\n").expect("valid page marker regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

/// A line repeating across pages is boilerplate once it hits `max(3, pages/2)`.
const MIN_BOILERPLATE_REPEATS: usize = 3;
/// Documents with fewer pages than this never lose lines; short documents do
/// not carry running headers, and skipping them keeps cleaning idempotent.
const MIN_BOILERPLATE_PAGES: usize = 3;

/// Normalize extracted text for segmentation.
///
/// Passes, in order:
/// 1. collapse runs of horizontal whitespace (not newlines) to one space,
/// 2. replace decorative bullet/box glyphs with a space,
/// 3. drop characters outside printable ASCII + Latin Extended (tab, newline,
///    and carriage return survive),
/// 4. collapse repeated spaces,
/// 5. drop lines repeated across most pages (running headers/footers),
/// 6. collapse 3+ consecutive newlines to exactly 2.
pub fn clean(raw: &str) -> String {
    let text = HORIZONTAL_WS.replace_all(raw, " ");
    let text = DECORATIVE_GLYPHS.replace_all(&text, " ");
    let text = NON_PRINTABLE.replace_all(&text, " ");
    let text = DOUBLE_SPACES.replace_all(&text, " ");
    let text = remove_repeating_lines(&text);
    EXCESS_NEWLINES.replace_all(&text, "\n\n").into_owned()
}

/// Drop lines that recur across a majority of pages.
///
/// Pages are delimited by the extractor's `--- Page N ---` markers; the
/// markers themselves are consumed here and pages are rejoined with a blank
/// line. Plain-text inputs split as a single page and pass through untouched.
fn remove_repeating_lines(text: &str) -> String {
    let pages: Vec<&str> = PAGE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect();

    if pages.len() < MIN_BOILERPLATE_PAGES {
        return pages.join("\n\n");
    }

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for page in &pages {
        for line in page.lines() {
            let line = line.trim();
            if !line.is_empty() {
                *frequency.entry(line).or_insert(0) += 1;
            }
        }
    }

    let threshold = MIN_BOILERPLATE_REPEATS.max(pages.len() / 2);
    let boilerplate: HashSet<&str> = frequency
        .iter()
        .filter(|&(_, &count)| count >= threshold)
        .map(|(&line, _)| line)
        .collect();

    if !boilerplate.is_empty() {
        tracing::debug!(
            pages = pages.len(),
            lines = boilerplate.len(),
            "Dropping repeated header/footer lines"
        );
    }

    pages
        .iter()
        .map(|page| {
            page.lines()
                .filter(|line| !boilerplate.contains(line.trim()))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_horizontal_whitespace_and_tabs() {
        assert_eq!(clean("a \t  b\nc"), "a b\nc");
    }

    #[test]
    fn strips_decorative_glyphs() {
        assert_eq!(clean("• item ▪ other"), "item other");
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(clean("a\u{0}b\u{7}c"), "a b c");
    }

    #[test]
    fn keeps_latin_extended_letters() {
        assert_eq!(clean("naïve café łódź"), "naïve café łódź");
    }

    #[test]
    fn collapses_newline_runs_to_two() {
        assert_eq!(clean("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn removes_lines_repeated_across_pages() {
        let text = "\n--- Page 1 ---\nAcme Corp Confidential\nalpha\n\
                    \n--- Page 2 ---\nAcme Corp Confidential\nbravo\n\
                    \n--- Page 3 ---\nAcme Corp Confidential\ncharlie\n";
        let cleaned = clean(text);
        assert!(!cleaned.contains("Acme Corp Confidential"));
        assert_eq!(cleaned, "alpha\n\nbravo\n\ncharlie");
    }

    #[test]
    fn short_documents_keep_repeated_lines() {
        let text = "\n--- Page 1 ---\nrepeat\nrepeat\nrepeat\nbody\n";
        let cleaned = clean(text);
        assert_eq!(cleaned.matches("repeat").count(), 3);
    }

    #[test]
    fn page_markers_are_consumed() {
        let cleaned = clean("\n--- Page 1 ---\nalpha\n\n--- Page 2 ---\nbravo\n");
        assert!(!cleaned.contains("--- Page"));
        assert_eq!(cleaned, "alpha\n\nbravo");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "a \t b\u{0}\n\n\n\nc • d",
            "\n--- Page 1 ---\nfooter\nalpha\n\n--- Page 2 ---\nfooter\nbravo\n\
             \n--- Page 3 ---\nfooter\ncharlie\n\n--- Page 4 ---\nfooter\ndelta\n",
            "",
            "plain text without any markers",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {sample:?}");
        }
    }
}
