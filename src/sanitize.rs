//! Identifier sanitization for table and column names.
//!
//! Every identifier that reaches the database goes through
//! [`sanitize_name`]; values are always bound as parameters. Nothing
//! user-supplied is interpolated into SQL beyond a sanitized identifier.

/// Maximum identifier length, matching the PostgreSQL limit the original
/// schema was sized for.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Convert arbitrary text into a safe SQL identifier.
///
/// Lowercases, replaces every non-`[a-z0-9_]` character with `_`, collapses
/// runs of `_`, strips leading/trailing `_`, and truncates to
/// [`MAX_IDENTIFIER_LEN`] bytes. Total and idempotent; the empty string maps
/// to the empty string, which callers must reject as an invalid name.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(MAX_IDENTIFIER_LEN));
    let mut last_underscore = false;

    for ch in name.chars() {
        let mapped = match ch.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9') => Some(c),
            _ => None,
        };
        match mapped {
            Some(c) => {
                out.push(c);
                last_underscore = false;
            }
            None => {
                if !last_underscore && !out.is_empty() {
                    out.push('_');
                }
                last_underscore = true;
            }
        }
        if out.len() >= MAX_IDENTIFIER_LEN {
            break;
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    out.truncate(MAX_IDENTIFIER_LEN);
    out
}

/// Quote an already-sanitized identifier for use in a SQL statement.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{name}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_replaces_non_word_chars() {
        assert_eq!(sanitize_name("Full Name"), "full_name");
        assert_eq!(sanitize_name("Price ($)"), "price");
        assert_eq!(sanitize_name("a-b.c"), "a_b_c");
    }

    #[test]
    fn collapses_and_trims_underscores() {
        assert_eq!(sanitize_name("__a___b__"), "a_b");
        assert_eq!(sanitize_name("  spaced  out  "), "spaced_out");
    }

    #[test]
    fn truncates_to_limit() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_name(&long).len(), MAX_IDENTIFIER_LEN);
    }

    #[test]
    fn empty_and_symbol_only_inputs_map_to_empty() {
        assert_eq!(sanitize_name(""), "");
        assert_eq!(sanitize_name("!!!"), "");
    }

    #[test]
    fn idempotent_over_assorted_inputs() {
        for s in [
            "Full Name",
            "___",
            "Таблица",
            "report 2024-01",
            "x",
            "a b c d e",
            "UPPER_CASE",
        ] {
            let once = sanitize_name(s);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn output_alphabet_is_restricted() {
        for s in ["Weird!@#$%Name", "tab\there", "new\nline", "100%"] {
            let out = sanitize_name(s);
            assert!(out.len() <= MAX_IDENTIFIER_LEN);
            assert!(
                out.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "bad char in {out:?}"
            );
            assert!(!out.starts_with('_') && !out.ends_with('_'));
        }
    }
}
