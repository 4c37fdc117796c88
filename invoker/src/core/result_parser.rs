//! Extraction of the integer result from engine stdout.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::literal::is_integer_literal;
use crate::core::types::ParsedResult;
use crate::error::InvokeError;

static NON_NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9-]").unwrap());

/// Parse the first numeric-looking token of `stdout`.
///
/// Every character other than an ASCII digit or `-` becomes a space, the text
/// is split on whitespace, and the first token is the candidate. Engines that
/// print diagnostics before the value will have the first number in those
/// diagnostics taken as the result. `"12.5"` tokenizes to `"12"` and `"5"`, so
/// the result is `"12"`.
pub fn parse_result(stdout: &str) -> Result<ParsedResult, InvokeError> {
    let stripped = NON_NUMERIC_RE.replace_all(stdout.trim(), " ");
    let Some(candidate) = stripped.split_whitespace().next() else {
        return Err(InvokeError::NoResult {
            stdout: stdout.to_string(),
        });
    };
    if !is_integer_literal(candidate) {
        return Err(InvokeError::MalformedResult {
            candidate: candidate.to_string(),
            stdout: stdout.to_string(),
        });
    }
    Ok(ParsedResult::new(candidate.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(stdout: &str) -> String {
        parse_result(stdout).expect("parse").into_string()
    }

    #[test]
    fn parses_bare_value() {
        assert_eq!(parsed("42"), "42");
        assert_eq!(parsed("  -17\n"), "-17");
    }

    #[test]
    fn first_numeric_token_wins() {
        assert_eq!(parsed("result = 42 ok"), "42");
        assert_eq!(parsed("warning: 3 exports ignored\n99\n"), "3");
    }

    #[test]
    fn decimal_splits_into_tokens() {
        assert_eq!(parsed("12.5"), "12");
    }

    #[test]
    fn keeps_wide_values_as_text() {
        let wide = "123456789012345678901234567890";
        assert_eq!(parsed(wide), wide);
    }

    #[test]
    fn no_digits_is_no_result() {
        let err = parse_result("no numbers here").unwrap_err();
        assert!(matches!(err, InvokeError::NoResult { stdout } if stdout == "no numbers here"));
        assert!(matches!(parse_result(""), Err(InvokeError::NoResult { .. })));
    }

    #[test]
    fn stray_minus_is_malformed() {
        let err = parse_result("value - 5").unwrap_err();
        match err {
            InvokeError::MalformedResult { candidate, stdout } => {
                assert_eq!(candidate, "-");
                assert_eq!(stdout, "value - 5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            parse_result("1-2"),
            Err(InvokeError::MalformedResult { candidate, .. }) if candidate == "1-2"
        ));
    }
}
