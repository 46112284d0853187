//! Lenient parsing of provider output: title, citations, structure.
//!
//! Parsing never fails. Anything that does not match is left in the body
//! rather than risking truncation of real content.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("valid title regex"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,3})\s+(.+)$").expect("valid heading regex"));
static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid citation regex"));
static SOURCES_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^##+\s*(sources|references|citations)\s*$").expect("valid sources regex")
});

/// One extracted citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    /// URL host with a leading "www." stripped; empty if the URL is invalid.
    pub domain: String,
    pub is_verified: bool,
    pub relevance_score: Option<f64>,
}

/// A heading found in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 for `#`, 2 for `##`, 3 for `###`.
    pub level: u8,
    pub text: String,
}

/// Structural summary of the generated markdown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentStructure {
    pub word_count: usize,
    pub heading_count: usize,
    pub reading_time_minutes: usize,
    pub headings: Vec<Heading>,
}

/// Parsed provider output.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Body markdown with any sources section removed.
    pub markdown: String,
    /// First `#` heading, if present.
    pub title: Option<String>,
    pub sources: Vec<Source>,
    pub structure: ContentStructure,
}

/// Parse raw provider output.
pub fn parse(raw: &str) -> ParsedResponse {
    let trimmed = raw.trim();

    let title = TITLE_RE
        .captures(trimmed)
        .map(|caps| caps[1].trim().to_string());

    let (markdown, sources) = match locate_sources_section(trimmed) {
        Some((start, end)) => {
            let sources = parse_sources(&trimmed[start..end]);
            let mut body = String::with_capacity(trimmed.len());
            body.push_str(&trimmed[..start]);
            body.push_str(&trimmed[end..]);
            (body.trim().to_string(), sources)
        }
        None => (trimmed.to_string(), Vec::new()),
    };

    let structure = analyze_structure(&markdown);

    ParsedResponse {
        markdown,
        title,
        sources,
        structure,
    }
}

/// Find the byte range of a trailing sources section: a `##` heading whose
/// text is exactly Sources, References, or Citations, through the line
/// before the next `##` heading or end of input.
fn locate_sources_section(text: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim_end_matches(['\n', '\r']);

        match start {
            None => {
                if SOURCES_HEADING_RE.is_match(trimmed.trim()) {
                    start = Some(line_start);
                }
            }
            Some(begin) => {
                if trimmed.starts_with("##") {
                    return Some((begin, line_start));
                }
            }
        }
    }

    start.map(|begin| (begin, text.len()))
}

/// Extract `[Title](url)` citations from a sources section body.
fn parse_sources(section: &str) -> Vec<Source> {
    CITATION_RE
        .captures_iter(section)
        .map(|caps| {
            let url = caps[2].trim().to_string();
            Source {
                title: caps[1].trim().to_string(),
                url: url.clone(),
                domain: domain_of(&url),
                is_verified: false,
                relevance_score: None,
            }
        })
        .collect()
}

fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .map(|host| host.strip_prefix("www.").unwrap_or(&host).to_string())
        .unwrap_or_default()
}

fn analyze_structure(markdown: &str) -> ContentStructure {
    let headings: Vec<Heading> = HEADING_RE
        .captures_iter(markdown)
        .map(|caps| Heading {
            level: caps[1].len() as u8,
            text: caps[2].trim().to_string(),
        })
        .collect();

    let word_count = markdown.split_whitespace().count();

    ContentStructure {
        word_count,
        heading_count: headings.len(),
        reading_time_minutes: std::cmp::max(1, word_count / 200),
        headings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let raw = "# My Title\n\nBody text.\n\n## Sources\n- [Example](https://www.example.com/a)\n";
        let parsed = parse(raw);

        assert_eq!(parsed.title.as_deref(), Some("My Title"));
        assert_eq!(parsed.sources.len(), 1);
        assert_eq!(parsed.sources[0].title, "Example");
        assert_eq!(parsed.sources[0].url, "https://www.example.com/a");
        assert_eq!(parsed.sources[0].domain, "example.com");
        assert!(!parsed.sources[0].is_verified);
        assert_eq!(parsed.sources[0].relevance_score, None);
        assert!(!parsed.markdown.contains("## Sources"));
        assert!(parsed.markdown.contains("Body text."));
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse("");

        assert_eq!(parsed.markdown, "");
        assert_eq!(parsed.title, None);
        assert!(parsed.sources.is_empty());
        assert_eq!(parsed.structure.word_count, 0);
        assert!(parsed.structure.headings.is_empty());
        assert_eq!(parsed.structure.reading_time_minutes, 1);
    }

    #[test]
    fn test_no_title_heading() {
        let parsed = parse("Just plain text without headings.");
        assert_eq!(parsed.title, None);
        assert_eq!(parsed.structure.heading_count, 0);
        assert_eq!(parsed.structure.word_count, 5);
    }

    #[test]
    fn test_references_variant_case_insensitive() {
        let raw = "# T\n\nBody.\n\n## REFERENCES\n- [A](https://a.com/x)\n- [B](https://b.org/y)\n";
        let parsed = parse(raw);

        assert_eq!(parsed.sources.len(), 2);
        assert_eq!(parsed.sources[1].domain, "b.org");
        assert!(!parsed.markdown.to_lowercase().contains("references"));
    }

    #[test]
    fn test_sources_section_ends_at_next_heading() {
        let raw = "# T\n\n## Sources\n- [A](https://a.com)\n\n## Conclusion\nFinal thoughts.";
        let parsed = parse(raw);

        assert_eq!(parsed.sources.len(), 1);
        assert!(parsed.markdown.contains("## Conclusion"));
        assert!(parsed.markdown.contains("Final thoughts."));
        assert!(!parsed.markdown.contains("## Sources"));
    }

    #[test]
    fn test_heading_with_sources_in_prose_kept() {
        // "## Sources of funding" is not an exact keyword match; leave it alone.
        let raw = "# T\n\n## Sources of funding\nGrants mostly.";
        let parsed = parse(raw);

        assert!(parsed.sources.is_empty());
        assert!(parsed.markdown.contains("## Sources of funding"));
    }

    #[test]
    fn test_invalid_citation_url_gets_empty_domain() {
        let raw = "# T\n\n## Sources\n- [Broken](not a url)\n";
        let parsed = parse(raw);

        assert_eq!(parsed.sources.len(), 1);
        assert_eq!(parsed.sources[0].domain, "");
    }

    #[test]
    fn test_structure_heading_levels() {
        let parsed = parse("# One\n\n## Two\n\n### Three\n\nwords here now");
        let levels: Vec<u8> = parsed.structure.headings.iter().map(|h| h.level).collect();

        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(parsed.structure.heading_count, 3);
    }

    #[test]
    fn test_reading_time_scales() {
        let long = "word ".repeat(450);
        let parsed = parse(&long);
        assert_eq!(parsed.structure.reading_time_minutes, 2);
    }
}
