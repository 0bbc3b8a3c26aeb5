//! Normalization of raw model completions into a single move token.
//!
//! The model is asked for a bare SAN move but routinely wraps it in
//! markdown fences or chatty prefixes. Cleanup is an ordered list of small
//! rules so each step stays independently testable.

/// Filler prefixes stripped case-insensitively before tokenizing.
const FILLER_PREFIXES: &[&str] = &[
    "move:",
    "my move:",
    "best move:",
    "i play",
    "i suggest",
    "the move is",
];

/// A single cleanup step applied to the working string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CleanupRule {
    /// Remove triple-backtick fences (with optional language tag) and any
    /// stray single backticks.
    StripFences,
    /// Strip the enumerated filler prefixes, repeatedly, case-insensitively.
    StripPrefixes,
    /// Keep only the first whitespace-delimited token, falling back to the
    /// whole (trimmed) string when there is none.
    FirstToken,
}

const PIPELINE: &[CleanupRule] = &[
    CleanupRule::StripFences,
    CleanupRule::StripPrefixes,
    CleanupRule::FirstToken,
];

/// Reduce a raw completion to a single move token.
///
/// Total on any input and idempotent; performs no chess-notation
/// validation. An all-whitespace input yields the empty string.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    for rule in PIPELINE {
        text = apply(*rule, &text);
    }
    text
}

fn apply(rule: CleanupRule, text: &str) -> String {
    match rule {
        CleanupRule::StripFences => strip_fences(text),
        CleanupRule::StripPrefixes => strip_prefixes(text),
        CleanupRule::FirstToken => first_token(text),
    }
}

fn strip_fences(text: &str) -> String {
    let mut out = text.replace("```", "");
    out = out.replace('`', "");
    out.trim().to_string()
}

fn strip_prefixes(text: &str) -> String {
    let mut rest = text.trim();
    'outer: loop {
        for prefix in FILLER_PREFIXES {
            if let Some(stripped) = strip_one_prefix(rest, prefix) {
                rest = stripped;
                continue 'outer;
            }
        }
        break;
    }
    rest.to_string()
}

/// Strip a single filler prefix, case-insensitively. Word-style prefixes
/// ("i play") must be followed by whitespace so "I played e4" is left alone.
fn strip_one_prefix<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &text[prefix.len()..];
    if prefix.ends_with(':') || rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn first_token(text: &str) -> String {
    text.split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| text.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_clean_token_through() {
        assert_eq!(normalize("Nf3"), "Nf3");
        assert_eq!(normalize("O-O"), "O-O");
        assert_eq!(normalize("exd5+"), "exd5+");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize("  e4  \n"), "e4");
    }

    #[test]
    fn strips_triple_backtick_fences() {
        assert_eq!(normalize("```e4```"), "e4");
        assert_eq!(normalize("```\nNf3\n```"), "Nf3");
    }

    #[test]
    fn strips_single_backticks() {
        assert_eq!(normalize("`Qxf7#`"), "Qxf7#");
    }

    #[test]
    fn strips_filler_prefixes_case_insensitively() {
        assert_eq!(normalize("Best move: Nf3"), "Nf3");
        assert_eq!(normalize("best move: Nf3"), "Nf3");
        assert_eq!(normalize("MOVE: e4"), "e4");
        assert_eq!(normalize("My move: d4"), "d4");
        assert_eq!(normalize("I play e5"), "e5");
        assert_eq!(normalize("I suggest Bc4"), "Bc4");
        assert_eq!(normalize("The move is O-O-O"), "O-O-O");
    }

    #[test]
    fn strips_stacked_prefixes() {
        assert_eq!(normalize("My move: Best move: e4"), "e4");
    }

    #[test]
    fn leaves_prefix_lookalikes_alone() {
        assert_eq!(normalize("I played e4"), "I");
    }

    #[test]
    fn keeps_only_first_token() {
        assert_eq!(normalize("e4 is clearly strongest here"), "e4");
    }

    #[test]
    fn fences_and_prefix_combined() {
        assert_eq!(normalize("```\nBest move: Nf3\n```"), "Nf3");
    }

    #[test]
    fn whitespace_only_yields_empty() {
        assert_eq!(normalize("  "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent() {
        for input in [
            "Best move: Nf3",
            "```e4```",
            "  ",
            "I play `d4` because center",
            "O-O",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn nonempty_meaningful_input_yields_nonempty_token() {
        assert!(!normalize("Move: ```  Qh5  ```").is_empty());
    }
}
