//! Logging helpers for player-supplied text (names, command tokens) so log lines stay
//! single-line and cannot be forged by embedding newlines in a command argument.

use std::fmt::Write;

const MAX_PREVIEW: usize = 120;

/// Escape a string for single-line logging.
///
/// Backslash, `\n`, `\r` and `\t` become two-character escapes, other control
/// characters become `\xNN`. Anything past 120 characters is cut with an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Render a command token list as it was typed, each token escaped.
pub fn escape_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| escape_log(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
