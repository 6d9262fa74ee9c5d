//! One-line previews of clipboard text for terminal output
//!
//! # Security: Terminal Injection Prevention
//!
//! Clipboard text comes from arbitrary applications. It can contain ANSI
//! escape sequences that clear the screen, move the cursor or recolor the
//! terminal, so every preview goes through [`strip_ansi_codes`] first.

/// Removes terminal escape sequences and control characters other than whitespace
///
/// Text copied out of a terminal often carries SGR colors (`ESC [ ... m`) and
/// OSC sequences such as hyperlinks (`ESC ] 8 ; ; url BEL`). Both are dropped
/// with their payload; any other escape drops `ESC` and the byte after it.
///
/// # Examples
///
/// ```
/// use clip_history::utils::preview::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            if !ch.is_control() || matches!(ch, '\t' | '\n' | '\r') {
                result.push(ch);
            }
            continue;
        }

        match chars.next() {
            // CSI: parameters up to a final byte in '@'..='~'
            Some('[') => {
                for next_ch in chars.by_ref() {
                    if ('@'..='~').contains(&next_ch) {
                        break;
                    }
                }
            }
            // OSC: payload up to BEL or ST (ESC \)
            Some(']') => {
                while let Some(next_ch) = chars.next() {
                    if next_ch == '\x07' {
                        break;
                    }
                    if next_ch == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    result
}

/// Collapse `text` to a single sanitized line of at most `max_chars` characters
///
/// # Examples
///
/// ```
/// use clip_history::utils::preview::preview_line;
///
/// assert_eq!(preview_line("first\nsecond", 40), "first second");
/// assert_eq!(preview_line("abcdefgh", 5), "abcd…");
/// ```
pub fn preview_line(text: &str, max_chars: usize) -> String {
    let cleaned = strip_ansi_codes(text);
    let single_line = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut truncated: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes_colored_terminal_output() {
        let copied = "\x1b[01;34msrc\x1b[0m  \x1b[01;32mbuild.sh\x1b[0m";
        assert_eq!(strip_ansi_codes(copied), "src  build.sh");
    }

    #[test]
    fn test_strip_ansi_codes_osc_hyperlink() {
        let link = "see \x1b]8;;https://example.com\x07docs\x1b]8;;\x07 now";
        assert_eq!(strip_ansi_codes(link), "see docs now");

        let with_st = "\x1b]0;window title\x1b\\prompt$";
        assert_eq!(strip_ansi_codes(with_st), "prompt$");
    }

    #[test]
    fn test_strip_ansi_codes_lone_and_unterminated_escapes() {
        assert_eq!(strip_ansi_codes("trailing\x1b"), "trailing");
        assert_eq!(strip_ansi_codes("a\x1b7b"), "ab");
        assert_eq!(strip_ansi_codes("cut \x1b[31"), "cut ");
        assert_eq!(strip_ansi_codes("cut \x1b]2;never ends"), "cut ");
    }

    #[test]
    fn test_strip_ansi_codes_keeps_whitespace_drops_nul() {
        assert_eq!(strip_ansi_codes("a\tb\r\nc\0d"), "a\tb\r\ncd");
    }

    #[test]
    fn test_preview_line_collapses_whitespace() {
        assert_eq!(preview_line("  Line 1\n\tLine 2\r\n", 80), "Line 1 Line 2");
    }

    #[test]
    fn test_preview_line_truncates_by_chars() {
        assert_eq!(preview_line("世界世界世界", 4), "世界世…");
        assert_eq!(preview_line("exact", 5), "exact");
    }

    #[test]
    fn test_preview_line_strips_escapes() {
        assert_eq!(preview_line("\x1b[1mbold\x1b[0m", 20), "bold");
    }
}
