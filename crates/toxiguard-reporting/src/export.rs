//! Tabular export of stored comments
//!
//! One row per record with every record field as a column. CSV output
//! quotes fields per RFC 4180, so commas, quotes and line breaks inside
//! comment text survive a round trip through a spreadsheet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use toxiguard_core::{CommentRecord, Error, Result};

const CSV_HEADER: &[&str] = &[
    "id",
    "author",
    "text",
    "label",
    "status",
    "created_at",
    "score",
    "profile_color",
];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Jsonl => "application/x-ndjson",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "jsonl" | "jsonlines" | "ndjson" => Ok(ExportFormat::Jsonl),
            other => Err(Error::validation(format!(
                "unknown export format '{other}', expected csv, json or jsonl"
            ))),
        }
    }
}

/// Write `records` to `out`, returning the number of rows written
pub fn export_records<W: Write>(
    records: &[CommentRecord],
    format: ExportFormat,
    mut out: W,
) -> Result<usize> {
    match format {
        ExportFormat::Jsonl => {
            for record in records {
                serde_json::to_writer(&mut out, record)?;
                out.write_all(b"\n")?;
            }
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records)?;
            out.write_all(b"\n")?;
        }
        ExportFormat::Csv => {
            write_csv_row(&mut out, CSV_HEADER.iter().copied())?;
            for record in records {
                let id = record.id.to_string();
                let created_at = record.created_at.to_rfc3339();
                let score = record.score.map(|s| s.to_string()).unwrap_or_default();
                write_csv_row(
                    &mut out,
                    [
                        id.as_str(),
                        record.author.as_str(),
                        record.text.as_str(),
                        record.label.as_str(),
                        record.status.as_str(),
                        created_at.as_str(),
                        score.as_str(),
                        record.profile_color.as_deref().unwrap_or(""),
                    ],
                )?;
            }
        }
    }

    out.flush()?;
    Ok(records.len())
}

fn write_csv_row<'a, W: Write>(
    out: &mut W,
    fields: impl IntoIterator<Item = &'a str>,
) -> std::io::Result<()> {
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&csv_field(field));
    }
    line.push_str("\r\n");
    out.write_all(line.as_bytes())
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toxiguard_core::{Author, Label};

    fn records() -> Vec<CommentRecord> {
        vec![
            CommentRecord::accepted(
                &Author::new("Code Ninja").with_color("rgb(120,150,180)"),
                "Hello there",
                Label::NonToxic,
                Some(0.25),
            ),
            CommentRecord::accepted(
                &Author::new("bob"),
                "You are \"stupid\", really\nstupid",
                Label::Toxic,
                None,
            ),
        ]
    }

    #[test]
    fn test_csv_quotes_special_characters() {
        let mut out = Vec::new();
        let rows = export_records(&records(), ExportFormat::Csv, &mut out).unwrap();
        assert_eq!(rows, 2);

        let csv = String::from_utf8(out).unwrap();
        assert!(csv.starts_with("id,author,text,label,status,created_at,score,profile_color\r\n"));
        assert!(csv.contains(",Hello there,non_toxic,accepted,"));
        assert!(csv.contains(",0.25,\"rgb(120,150,180)\"\r\n"));
        assert!(csv.contains(",\"You are \"\"stupid\"\", really\nstupid\",toxic,accepted,"));
    }

    #[test]
    fn test_jsonl_one_record_per_line() {
        let records = records();
        let mut out = Vec::new();
        export_records(&records, ExportFormat::Jsonl, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let parsed: Vec<CommentRecord> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_json_array() {
        let records = records();
        let mut out = Vec::new();
        export_records(&records, ExportFormat::Json, &mut out).unwrap();

        let parsed: Vec<CommentRecord> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_empty_csv_has_header_only() {
        let mut out = Vec::new();
        export_records(&[], ExportFormat::Csv, &mut out).unwrap();
        assert_eq!(out.iter().filter(|b| **b == b'\n').count(), 1);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("ndjson".parse::<ExportFormat>().unwrap(), ExportFormat::Jsonl);
        assert!(matches!("xml".parse::<ExportFormat>(), Err(Error::Validation(_))));
    }
}
