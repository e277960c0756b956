// SPDX-License-Identifier: MIT
//! Minimal CSV encoding for the flat-row exports.
//!
//! Fields containing a comma, double quote, or line break are quoted with
//! embedded quotes doubled; rows end with CRLF, the common spreadsheet
//! dialect.

use std::borrow::Cow;
use std::io::{self, Write};

/// Quote `field` if it contains a delimiter, quote, or line break.
fn encode_field(field: &str) -> Cow<'_, str> {
    let needs_quoting = field
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r'));
    if !needs_quoting {
        return Cow::Borrowed(field);
    }

    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push('"');
    for c in field.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Row-at-a-time CSV writer over any [`Write`] sink.
pub struct CsvWriter<W: Write> {
    out: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one record; every field is encoded independently.
    pub fn write_record<'a, I>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                self.out.write_all(b",")?;
            }
            first = false;
            self.out.write_all(encode_field(field).as_bytes())?;
        }
        self.out.write_all(b"\r\n")
    }

    /// Flush and release the underlying sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> String {
        let mut writer = CsvWriter::new(Vec::new());
        writer.write_record(fields.iter().copied()).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(record(&["a", "b", "c"]), "a,b,c\r\n");
    }

    #[test]
    fn empty_fields_stay_empty() {
        assert_eq!(record(&["a", "", "c"]), "a,,c\r\n");
    }

    #[test]
    fn comma_and_newline_force_quoting() {
        assert_eq!(record(&["a,b", "x\ny"]), "\"a,b\",\"x\ny\"\r\n");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(record(&[r#"say "hi""#]), "\"say \"\"hi\"\"\"\r\n");
    }
}
