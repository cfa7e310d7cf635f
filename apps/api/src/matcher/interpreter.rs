//! Reply interpreter — turns loosely structured model output into a `MatchResult`.
//!
//! Never fails. Stages run in a fixed order and each one only contributes the
//! fields earlier stages left empty:
//! 1. the embedded JSON object (first `{` .. last `}`)
//! 2. a percentage pattern anywhere in the reply
//! 3. numbered, bulleted or "tip"-like lines
//!
//! Anything still missing afterwards gets a default (0 / placeholder tip).

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::matcher::models::MatchResult;

const MAX_TIPS: usize = 3;
/// A tip line must be strictly longer than this.
const MIN_TIP_LINE_CHARS: usize = 20;
/// A cleaned tip must be strictly longer than this.
const MIN_TIP_CHARS: usize = 10;
const MAX_PERCENTAGE: u32 = 100;

pub const PLACEHOLDER_TIP: &str = "Review the full analysis for detailed recommendations.";

static JSON_PERCENTAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""matchPercentage"\s*:\s*([0-9]+)"#)
        .expect("Should compile: JSON_PERCENTAGE_RE")
});
static JSON_TIPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""topTips"\s*:\s*\[([^\]]+)\]"#).expect("Should compile: JSON_TIPS_RE")
});
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("Should compile: QUOTED_RE"));
// "85%", "85 percent", "match: 85"; whichever occurs first in the text wins.
static TEXT_PERCENTAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)%|([0-9]+)\s*percent|match[:\s]*([0-9]+)")
        .expect("Should compile: TEXT_PERCENTAGE_RE")
});
static NUMBERED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+[.)]\s+.").expect("Should compile: NUMBERED_LINE_RE"));
static BULLET_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-•*]\s+.").expect("Should compile: BULLET_LINE_RE"));
static TIP_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-•*.)]+").expect("Should compile: TIP_PREFIX_RE"));

/// What one stage managed to recover. `None` means "not found here".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct PartialMatch {
    match_percentage: Option<u32>,
    top_tips: Option<Vec<String>>,
}

impl PartialMatch {
    fn is_complete(&self) -> bool {
        self.match_percentage.is_some() && self.top_tips.is_some()
    }

    /// First non-empty value wins per field.
    fn merge(self, later: PartialMatch) -> Self {
        Self {
            match_percentage: self.match_percentage.or(later.match_percentage),
            top_tips: self.top_tips.or(later.top_tips),
        }
    }

    fn finish(self) -> MatchResult {
        MatchResult {
            match_percentage: self.match_percentage.unwrap_or(0),
            top_tips: self
                .top_tips
                .unwrap_or_else(|| vec![PLACEHOLDER_TIP.to_string()]),
        }
    }
}

type Stage = fn(&str) -> PartialMatch;

const STAGES: [(&str, Stage); 3] = [
    ("embedded_json", embedded_json),
    ("percentage_pattern", percentage_pattern),
    ("tip_lines", tip_lines),
];

/// Interprets a raw model reply. Pure: the same input always yields the same result.
pub fn interpret(raw: &str) -> MatchResult {
    let mut partial = PartialMatch::default();

    for (name, stage) in STAGES {
        if partial.is_complete() {
            break;
        }
        let found = stage(raw);
        debug!(
            stage = name,
            percentage = ?found.match_percentage,
            tips = found.top_tips.as_ref().map_or(0, Vec::len),
            "Interpreter stage finished"
        );
        partial = partial.merge(found);
    }

    partial.finish()
}

/// Stage 1: scan the outermost `{ ... }` span for the two known fields.
fn embedded_json(raw: &str) -> PartialMatch {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return PartialMatch::default();
    };
    if start >= end {
        return PartialMatch::default();
    }
    let candidate = &raw[start..=end];

    if let Err(e) = serde_json::from_str::<serde_json::Value>(candidate) {
        warn!("Model reply is not well-formed JSON, falling back to text heuristics: {e}");
    }

    let match_percentage = JSON_PERCENTAGE_RE
        .captures(candidate)
        .and_then(|c| c.get(1))
        .map(|m| parse_percentage(m.as_str()));

    let top_tips = JSON_TIPS_RE
        .captures(candidate)
        .and_then(|c| c.get(1))
        .map(|inner| {
            QUOTED_RE
                .captures_iter(inner.as_str())
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .take(MAX_TIPS)
                .collect::<Vec<_>>()
        })
        .filter(|tips| !tips.is_empty());

    PartialMatch {
        match_percentage,
        top_tips,
    }
}

/// Stage 2: first percentage-looking phrase anywhere in the reply.
fn percentage_pattern(raw: &str) -> PartialMatch {
    let match_percentage = TEXT_PERCENTAGE_RE.captures(raw).and_then(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .or_else(|| c.get(3))
            .map(|m| parse_percentage(m.as_str()))
    });

    PartialMatch {
        match_percentage,
        top_tips: None,
    }
}

/// Stage 3: line scan for list items and lines mentioning tips or suggestions.
fn tip_lines(raw: &str) -> PartialMatch {
    let tips: Vec<String> = raw
        .lines()
        .filter(|line| looks_like_tip(line))
        .filter_map(clean_tip)
        .take(MAX_TIPS)
        .collect();

    PartialMatch {
        match_percentage: None,
        top_tips: (!tips.is_empty()).then_some(tips),
    }
}

fn looks_like_tip(line: &str) -> bool {
    if line.chars().count() <= MIN_TIP_LINE_CHARS {
        return false;
    }
    let lower = line.to_lowercase();
    NUMBERED_LINE_RE.is_match(line)
        || BULLET_LINE_RE.is_match(line)
        || lower.contains("tip")
        || lower.contains("suggestion")
}

fn clean_tip(line: &str) -> Option<String> {
    let tip = TIP_PREFIX_RE.replace(line, "");
    let tip = tip.trim();
    (tip.chars().count() > MIN_TIP_CHARS).then(|| tip.to_string())
}

/// Digit runs only fail to parse on overflow; those saturate. Result is clamped to 0 – 100.
fn parse_percentage(digits: &str) -> u32 {
    digits.parse::<u32>().unwrap_or(u32::MAX).min(MAX_PERCENTAGE)
}
