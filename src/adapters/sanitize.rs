//! Log redaction for patient contact details.
//!
//! Intake records carry names, emails and patient identifiers. Log lines pass
//! through `SanitizingMakeWriter`, which masks:
//! - Email addresses
//! - Phone numbers
//! - Patient identifiers written as `patient_id=...` / `Patient ID: ...`
//!
//! Names cannot be recognised by pattern; code must not log them.

use std::io::Write;
use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

/// Lines longer than this are cut before redaction.
const MAX_LINE_BYTES: usize = 8 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        [
            (
                r"(?i)\b(?:patient[_ ]?id|mrn)\b\s*[:=]\s*[^\s,;]+",
                "patient_id=[REDACTED]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (
                r"\b(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
                "[REDACTED-PHONE]",
            ),
        ]
        .into_iter()
        .map(|(pattern, replacement)| Rule {
            regex: Regex::new(pattern).expect("Valid regex"),
            replacement,
        })
        .collect()
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Mask contact details and patient identifiers in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, MAX_LINE_BYTES);
    let mut out = prefix.to_string();
    for rule in rules() {
        if rule.regex.is_match(&out) {
            out = rule.regex.replace_all(&out, rule.replacement).into_owned();
        }
    }
    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// A `tracing_subscriber` writer wrapper that redacts each formatted line
/// before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by `SanitizingMakeWriter`.
pub struct SanitizingWriter<W: Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: Write> SanitizingWriter<W> {
    fn write_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(line);
        self.inner.write_all(sanitize(&text).as_bytes())
    }
}

impl<W: Write> Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_line(&line)?;
        }
        if self.buffer.len() > MAX_LINE_BYTES * 2 {
            let rest = std::mem::take(&mut self.buffer);
            self.write_line(&rest)?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.write_line(&rest)?;
        }
        self.inner.flush()
    }
}

impl<W: Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_email() {
        let out = sanitize("Simulating email delivery to jane.doe@clinic.org");
        assert!(out.contains("[REDACTED-EMAIL]"));
        assert!(!out.contains("jane.doe"));
    }

    #[test]
    fn test_redacts_patient_id() {
        let out = sanitize("Saved record patient_id=A-99812, files=2");
        assert_eq!(out, "Saved record patient_id=[REDACTED], files=2");
        assert!(sanitize("Patient ID: 12345").contains("[REDACTED]"));
    }

    #[test]
    fn test_redacts_phone() {
        assert!(sanitize("call 555-123-4567").contains("[REDACTED-PHONE]"));
    }

    #[test]
    fn test_leaves_plain_text() {
        let line = "Analysis complete: image 2 scored 0.7312";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_truncates_without_splitting_chars() {
        let long = "é".repeat(MAX_LINE_BYTES);
        let out = sanitize(&long);
        assert!(out.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_writer_redacts_lines() {
        let sink: Vec<u8> = Vec::new();
        let mut writer = SanitizingWriter {
            inner: sink,
            buffer: Vec::new(),
        };
        writer.write_all(b"to bob@example.com\npartial").expect("write");
        writer.flush().expect("flush");
        let written = String::from_utf8(std::mem::take(&mut writer.inner)).expect("utf8");
        assert_eq!(written, "to [REDACTED-EMAIL]\npartial");
    }
}
