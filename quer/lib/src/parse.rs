//! Input line and script name parsing.

use crate::types::{Directive, UndoTarget};

const UNDO: &str = "undo";

/// Classifies one input line as a directive or a command to queue.
///
/// Lines are matched exactly, without trimming: `"done "` is a command, not a
/// directive. An `undo` argument is read as a leading integer (optional sign,
/// then digits, anything after is ignored) and only compared against `all`
/// when it has no leading digits. So `undo 2x` targets position 2, and
/// `undo 00all` targets position 0, which is later rejected as out of range.
///
/// ## Examples
///
/// ```
/// use quer_lib::{parse_directive, Directive, UndoTarget};
///
/// assert_eq!(parse_directive("done"), Directive::Done);
/// assert_eq!(parse_directive("undo 2"), Directive::Undo(UndoTarget::Position(2)));
/// assert_eq!(parse_directive("undo all"), Directive::Undo(UndoTarget::All));
/// assert_eq!(parse_directive("ls -la"), Directive::Queue("ls -la"));
/// ```
#[must_use]
pub fn parse_directive(line: &str) -> Directive<'_> {
    match line {
        "done" => Directive::Done,
        "quit" => Directive::Quit,
        "show" => Directive::Show,
        UNDO => Directive::Undo(UndoTarget::Last),
        _ => match line.strip_prefix("undo ") {
            Some(argument) => Directive::Undo(parse_undo_argument(argument)),
            None => Directive::Queue(line),
        },
    }
}

fn parse_undo_argument(argument: &str) -> UndoTarget {
    let argument = argument.trim();

    match leading_integer(argument) {
        Some(position) => UndoTarget::Position(position),
        None if argument == "all" => UndoTarget::All,
        None => UndoTarget::Invalid(argument.to_string()),
    }
}

/// Reads an optional sign followed by at least one digit from the start of
/// `value`, ignoring whatever follows. Saturates instead of overflowing.
fn leading_integer(value: &str) -> Option<i64> {
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let digits_end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude = rest[..digits_end].bytes().fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

/// Validates a querscript name given on the command line.
///
/// Names become file names inside the script directory, so they must be
/// non-empty and may not contain path separators or refer to `.`/`..`.
///
/// ## Errors
///
/// Returns an error string if the name cannot be used as a script name.
///
/// ## Examples
///
/// ```
/// use quer_lib::parse_script_name;
///
/// assert_eq!(parse_script_name("deploy").unwrap(), "deploy");
/// assert!(parse_script_name("../deploy").is_err());
/// ```
pub fn parse_script_name(value: &str) -> Result<String, String> {
    let name = value.trim();

    if name.is_empty() {
        return Err("script name cannot be empty".to_string());
    }

    if name == "." || name == ".." {
        return Err("script name cannot be '.' or '..'".to_string());
    }

    if name.contains(['/', '\\', '\0']) {
        return Err("script name cannot contain path separators".to_string());
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_directives() {
        assert_eq!(parse_directive("done"), Directive::Done);
        assert_eq!(parse_directive("quit"), Directive::Quit);
        assert_eq!(parse_directive("show"), Directive::Show);
    }

    #[test]
    fn keywords_must_match_exactly() {
        assert_eq!(parse_directive("done "), Directive::Queue("done "));
        assert_eq!(parse_directive("Done"), Directive::Queue("Done"));
        assert_eq!(parse_directive("showme"), Directive::Queue("showme"));
    }

    #[test]
    fn bare_undo_targets_last_command() {
        assert_eq!(parse_directive("undo"), Directive::Undo(UndoTarget::Last));
    }

    #[test]
    fn undo_with_number_targets_position() {
        assert_eq!(
            parse_directive("undo 3"),
            Directive::Undo(UndoTarget::Position(3))
        );
        assert_eq!(
            parse_directive("undo  7 "),
            Directive::Undo(UndoTarget::Position(7))
        );
    }

    #[test]
    fn undo_keeps_zero_and_negative_positions() {
        assert_eq!(
            parse_directive("undo 0"),
            Directive::Undo(UndoTarget::Position(0))
        );
        assert_eq!(
            parse_directive("undo -2"),
            Directive::Undo(UndoTarget::Position(-2))
        );
    }

    #[test]
    fn undo_all_targets_everything() {
        assert_eq!(parse_directive("undo all"), Directive::Undo(UndoTarget::All));
    }

    #[test]
    fn undo_with_garbage_is_invalid() {
        assert_eq!(
            parse_directive("undo xyz"),
            Directive::Undo(UndoTarget::Invalid("xyz".to_string()))
        );
        assert_eq!(
            parse_directive("undo -"),
            Directive::Undo(UndoTarget::Invalid("-".to_string()))
        );
        assert_eq!(
            parse_directive("undo x2"),
            Directive::Undo(UndoTarget::Invalid("x2".to_string()))
        );
    }

    #[test]
    fn undo_reads_leading_digits_and_ignores_the_rest() {
        assert_eq!(
            parse_directive("undo 2x"),
            Directive::Undo(UndoTarget::Position(2))
        );
        assert_eq!(
            parse_directive("undo +3 please"),
            Directive::Undo(UndoTarget::Position(3))
        );
        assert_eq!(
            parse_directive("undo -4abc"),
            Directive::Undo(UndoTarget::Position(-4))
        );
    }

    #[test]
    fn number_parse_is_attempted_before_all() {
        assert_eq!(
            parse_directive("undo 00all"),
            Directive::Undo(UndoTarget::Position(0))
        );
        assert_eq!(
            parse_directive("undo allx"),
            Directive::Undo(UndoTarget::Invalid("allx".to_string()))
        );
    }

    #[test]
    fn undo_with_empty_argument_is_invalid() {
        assert_eq!(
            parse_directive("undo "),
            Directive::Undo(UndoTarget::Invalid(String::new()))
        );
    }

    #[test]
    fn overflowing_position_saturates() {
        assert_eq!(
            parse_directive("undo 99999999999999999999999"),
            Directive::Undo(UndoTarget::Position(i64::MAX))
        );
        assert_eq!(
            parse_directive("undo -99999999999999999999999"),
            Directive::Undo(UndoTarget::Position(-i64::MAX))
        );
    }

    #[test]
    fn words_starting_with_undo_are_commands() {
        assert_eq!(parse_directive("undone"), Directive::Queue("undone"));
    }

    #[test]
    fn empty_line_is_a_command() {
        assert_eq!(parse_directive(""), Directive::Queue(""));
    }

    #[test]
    fn script_name_is_trimmed() {
        assert_eq!(parse_script_name("  build ").unwrap(), "build");
    }

    #[test]
    fn script_name_rejects_empty() {
        assert!(parse_script_name("").is_err());
        assert!(parse_script_name("   ").is_err());
    }

    #[test]
    fn script_name_rejects_traversal() {
        assert!(parse_script_name("..").is_err());
        assert!(parse_script_name("a/b").is_err());
        assert!(parse_script_name(r"a\b").is_err());
    }
}
