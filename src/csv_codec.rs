//! Field and record codec for the ledger's CSV files.
//!
//! Writing is done field by field so the quoting rule stays exactly the one
//! the data files have always used: quote only when a field contains a comma,
//! a double quote, or a newline. Reading goes through the `csv` crate, which
//! understands the same quoting.

use csv::{ReaderBuilder, StringRecord};

/// Encodes one field, quoting it only when it contains `,`, `"` or `\n`.
pub fn encode_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Encodes an optional field; an absent value becomes the empty string.
pub fn encode_opt_field(field: Option<&str>) -> String {
    field.map(encode_field).unwrap_or_default()
}

/// Encodes and comma-joins a record. Numeric fields are passed as their text.
pub fn encode_record<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| encode_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes one record. An empty line decodes to a single empty field.
pub fn decode_record(line: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();

    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(str::to_string).collect(),
        _ => vec![String::new()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_are_written_bare() {
        assert_eq!(encode_field("Alice"), "Alice");
        assert_eq!(encode_field(""), "");
        assert_eq!(encode_field("  spaced  "), "  spaced  ");
        assert_eq!(encode_opt_field(None), "");
        assert_eq!(encode_opt_field(Some("x")), "x");
    }

    #[test]
    fn test_special_fields_are_quoted() {
        assert_eq!(encode_field("Smith, John"), "\"Smith, John\"");
        assert_eq!(encode_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(encode_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_encode_record_joins_with_commas() {
        let line = encode_record(["ACC1001", "Doe, Jane", "Savings", "0.00"]);
        assert_eq!(line, "ACC1001,\"Doe, Jane\",Savings,0.00");
    }

    #[test]
    fn test_decode_plain_and_quoted() {
        assert_eq!(decode_record("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(decode_record("a,,c"), vec!["a", "", "c"]);
        assert_eq!(decode_record("\"x,y\",z"), vec!["x,y", "z"]);
        assert_eq!(decode_record("\"he said \"\"no\"\"\""), vec!["he said \"no\""]);
        assert_eq!(decode_record(""), vec![""]);
    }

    #[test]
    fn test_round_trip_special_strings() {
        let cases = [
            ",",
            "\"",
            "\"\"",
            "a,b",
            "quote \" inside",
            "line1\nline2",
            "all, of \"them\"\nat once",
            ",leading and trailing,",
        ];
        for s in cases {
            assert_eq!(decode_record(&encode_record([s])), vec![s.to_string()], "case {:?}", s);
        }
    }

    #[test]
    fn test_round_trip_full_row() {
        let row = ["TX7", "ACC1001", "Deposit", "12.50", "2024-01-02 03:04:05"];
        assert_eq!(decode_record(&encode_record(row)), row.to_vec());
    }
}
