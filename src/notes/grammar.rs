//! Tag grammar of a note.
//!
//! Line rules, checked on every line after leading whitespace is dropped:
//!  - `###` starts the action line. The remainder of the line is the action.
//!  - `##` not followed by another `#` starts a category line. Every whitespace separated token is
//!    a category.
//!  - `@` starts a domain line. Every whitespace separated token is a domain.
//!
//! Span rules, matched over the whole text:
//!  - `$...$` is the reference. The span can't contain `$` nor a line break.
//!  - `“...”` (straight quotes work too) is the thoughts. The span may cover several lines.
//!
//! Action, reference and thoughts keep the first match. Categories and domains accumulate over all
//! lines.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(.*?)\$").expect("valid regex"));

static THOUGHTS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)[“"”](.*?)[”"“]"#).expect("valid regex"));

/// Structured facets of one note.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Facets {
    pub categories: BTreeSet<String>,
    pub action: Option<String>,
    pub domains: BTreeSet<String>,
    pub reference: Option<String>,
    pub thoughts: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    Action,
    Category,
    Domain,
}

impl LineRule {
    /// Order in which rules are tried. Action goes before category since its marker extends the
    /// category marker, although the category rule rejects `###` on its own as well.
    const PRECEDENCE: [LineRule; 3] = [LineRule::Action, LineRule::Category, LineRule::Domain];

    fn marker(&self) -> &'static str {
        match self {
            LineRule::Action => "###",
            LineRule::Category => "##",
            LineRule::Domain => "@",
        }
    }

    /// Returns the trimmed text after the marker, or None if the line doesn't follow the rule or
    /// has nothing after the marker.
    fn payload<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.trim_start().strip_prefix(self.marker())?;
        if *self == LineRule::Category && rest.starts_with('#') {
            return None;
        }
        Some(rest.trim()).filter(|v| !v.is_empty())
    }

    /// Finds the rule a line follows. At most one rule applies to any line.
    pub fn classify(line: &str) -> Option<(LineRule, &str)> {
        Self::PRECEDENCE
            .iter()
            .find_map(|rule| rule.payload(line).map(|payload| (*rule, payload)))
    }
}

/// Extracts facets from a note. Returns None for blank notes, which produce no records at all.
pub fn parse(raw_text: &str) -> Option<Facets> {
    let text = raw_text.trim();
    if text.is_empty() {
        return None;
    }

    let mut facets = Facets::default();

    for line in text.lines() {
        match LineRule::classify(line) {
            Some((LineRule::Action, payload)) => {
                facets.action.get_or_insert_with(|| payload.to_string());
            }
            Some((LineRule::Category, payload)) => {
                facets
                    .categories
                    .extend(payload.split_whitespace().map(str::to_string));
            }
            Some((LineRule::Domain, payload)) => {
                facets
                    .domains
                    .extend(payload.split_whitespace().map(str::to_string));
            }
            None => {}
        }
    }

    facets.reference = first_span(&REFERENCE_PATTERN, text);
    facets.thoughts = first_span(&THOUGHTS_PATTERN, text);

    Some(facets)
}

fn first_span(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|v| v.get(1))
        .map(|v| v.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}
