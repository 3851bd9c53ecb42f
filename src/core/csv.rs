//! Comma-separated text codec
//!
//! Used both for the table objects kept in the remote store and for the
//! spreadsheet export. Fields containing a comma, quote or line break are
//! quoted, with embedded quotes doubled.

/// UTF-8 byte-order mark, so spreadsheet programs detect the encoding
pub const BOM: char = '\u{feff}';

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

/// Encode one record, without the trailing line break.
pub fn encode_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let field = field.as_ref();
        if needs_quotes(field) {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }
    line
}

/// Encode a whole document, one `\n`-terminated line per record.
pub fn encode<S: AsRef<str>>(records: &[Vec<S>]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&encode_record(record));
        out.push('\n');
    }
    out
}

/// Decode a document into records.
///
/// Accepts `\n` and `\r\n` line endings and a leading BOM. Fails only on an
/// unterminated quoted field.
pub fn decode(text: &str) -> Result<Vec<Vec<String>>, String> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Whether the current line has any content; blank lines produce no record
    let mut line_started = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                line_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                line_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if line_started {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                line_started = false;
            }
            _ => {
                field.push(c);
                line_started = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if line_started {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        assert_eq!(encode_record(&["a", "b", ""]), "a,b,");
        assert_eq!(
            decode("a,b,\nc,d,e\n").unwrap(),
            vec![vec!["a", "b", ""], vec!["c", "d", "e"]]
        );
    }

    #[test]
    fn test_quoting() {
        let fields = ["Rice, white", "say \"hi\"", "two\nlines"];
        let line = encode_record(&fields);
        assert_eq!(line, "\"Rice, white\",\"say \"\"hi\"\"\",\"two\nlines\"");
        assert_eq!(decode(&line).unwrap(), vec![fields.to_vec()]);
    }

    #[test]
    fn test_crlf_bom_and_blank_lines() {
        let text = format!("{}h1,h2\r\n\r\nx,y\r\n", BOM);
        assert_eq!(
            decode(&text).unwrap(),
            vec![vec!["h1", "h2"], vec!["x", "y"]]
        );
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_eq!(decode("a,b").unwrap(), vec![vec!["a", "b"]]);
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(decode("a,\"b\n").is_err());
    }
}
