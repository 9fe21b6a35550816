//! iCalendar (RFC 5545) text primitives
//!
//! TEXT value escaping, content-line folding and the basic local
//! date-time format.

use chrono::NaiveDateTime;

/// Content line terminator
pub const CRLF: &str = "\r\n";

/// Maximum octets per content line before folding
pub const MAX_LINE_OCTETS: usize = 75;

/// Escape a TEXT value: backslash, semicolon, comma and newlines
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            other => out.push(other),
        }
    }
    out
}

/// Reverse of [`escape_text`]
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

/// Fold a content line so no physical line exceeds 75 octets.
/// Never splits inside a UTF-8 sequence.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str(CRLF);
            out.push(' ');
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}

/// Undo folding: drop every CRLF followed by a space or tab
pub fn unfold(content: &str) -> String {
    content.replace("\r\n ", "").replace("\r\n\t", "")
}

/// Local date-time in basic format, e.g. 20261020T083000
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

/// Accumulates CRLF-terminated, folded content lines
#[derive(Debug, Default)]
pub struct IcsWriter {
    buf: String,
}

impl IcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a property whose value is already in wire form
    pub fn property(&mut self, name: &str, value: &str) -> &mut Self {
        let line = format!("{}:{}", name, value);
        self.buf.push_str(&fold_line(&line));
        self.buf.push_str(CRLF);
        self
    }

    /// Write a TEXT property, escaping the value
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.property(name, &escape_text(value))
    }

    pub fn begin(&mut self, component: &str) -> &mut Self {
        self.property("BEGIN", component)
    }

    pub fn end(&mut self, component: &str) -> &mut Self {
        self.property("END", component)
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_escape_reserved_characters() {
        assert_eq!(escape_text("Mac, Cheese; More"), "Mac\\, Cheese\\; More");
        assert_eq!(escape_text("a\\b"), "a\\\\b");
        assert_eq!(escape_text("line1\nline2\r\nline3"), "line1\\nline2\\nline3");
        assert_eq!(escape_text("plain text"), "plain text");
    }

    #[test]
    fn test_unescape_recovers_original() {
        for original in ["Mac, Cheese; More", "C:\\path", "one\ntwo", "Turkey & Avocado Wrap", ""] {
            assert_eq!(unescape_text(&escape_text(original)), original);
        }
        assert_eq!(unescape_text("A\\NB"), "A\nB");
    }

    #[test]
    fn test_fold_short_line_untouched() {
        let line = "SUMMARY:Banana Oatmeal";
        assert_eq!(fold_line(line), line);
    }

    #[test]
    fn test_fold_long_line() {
        let line = format!("DESCRIPTION:{}", "x".repeat(200));
        let folded = fold_line(&line);
        for physical in folded.split(CRLF) {
            assert!(physical.len() <= MAX_LINE_OCTETS, "{} octets", physical.len());
        }
        assert!(folded.split(CRLF).skip(1).all(|l| l.starts_with(' ')));
        assert_eq!(unfold(&folded), line);
    }

    #[test]
    fn test_fold_respects_utf8_boundaries() {
        let line = format!("SUMMARY:{}", "é".repeat(80));
        let folded = fold_line(&line);
        for physical in folded.split(CRLF) {
            assert!(physical.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(unfold(&folded), line);
    }

    #[test]
    fn test_format_datetime() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(format_datetime(dt), "20260105T183000");
    }

    #[test]
    fn test_writer_emits_crlf_lines() {
        let mut writer = IcsWriter::new();
        writer.begin("VEVENT").text("SUMMARY", "Eggs, Toast").end("VEVENT");
        assert_eq!(
            writer.finish(),
            "BEGIN:VEVENT\r\nSUMMARY:Eggs\\, Toast\r\nEND:VEVENT\r\n"
        );
    }
}
