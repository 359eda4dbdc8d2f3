//! CSV export of analysis results and URL list import.

use audience_core::{AnalysisRecord, CoreError};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const CSV_HEADER: [&str; 9] = [
    "URL",
    "Channel Title",
    "Subscribers",
    "Videos",
    "Views",
    "Primary Category",
    "Kids %",
    "Teen %",
    "Serious %",
];

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let escaped: Vec<String> = fields
        .into_iter()
        .map(|field| escape_csv(field.as_ref()))
        .collect();
    escaped.join(",")
}

pub fn records_to_csv(records: &[AnalysisRecord]) -> String {
    let mut output = csv_line(CSV_HEADER);
    output.push('\n');

    for record in records {
        let row = [
            record.url.clone(),
            record.channel_title.clone(),
            record.subscribers.to_string(),
            record.videos.to_string(),
            record.views.to_string(),
            record.primary_category.to_string(),
            record.kids_pct.to_string(),
            record.teen_pct.to_string(),
            record.serious_pct.to_string(),
        ];
        output.push_str(&csv_line(row));
        output.push('\n');
    }

    output
}

pub fn write_csv(path: &Path, records: &[AnalysisRecord]) -> Result<(), CoreError> {
    fs::write(path, records_to_csv(records))?;
    info!("Exported {} results to {}", records.len(), path.display());
    Ok(())
}

/// `youtube_analysis_<YYYYmmdd_HHMMSS>.csv`
pub fn default_export_file_name(timestamp: NaiveDateTime) -> String {
    format!("youtube_analysis_{}.csv", timestamp.format("%Y%m%d_%H%M%S"))
}

/// One URL per line; surrounding whitespace and blank lines are dropped.
pub fn parse_url_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits CSV text into rows. Quoted fields may hold commas, doubled quotes
/// and line breaks.
pub fn parse_csv_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Reads the URL column of a CSV document with a header row.
///
/// `column` selects by header name (case-insensitive); the first column is
/// used when it is `None`. Empty cells are dropped.
pub fn parse_csv_urls(text: &str, column: Option<&str>) -> Result<Vec<String>, CoreError> {
    let mut rows = parse_csv_rows(text).into_iter();
    let header = rows.next().ok_or_else(|| CoreError::InvalidInput {
        message: "CSV input is empty".to_string(),
    })?;

    let index = match column {
        None => 0,
        Some(name) => header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CoreError::InvalidInput {
                message: format!(
                    "column '{}' not found (available: {})",
                    name,
                    header.join(", ")
                ),
            })?,
    };

    let urls: Vec<String> = rows
        .filter_map(|row| row.get(index).map(|cell| cell.trim().to_string()))
        .filter(|cell| !cell.is_empty() && cell != "nan")
        .collect();
    debug!("Read {} URLs from CSV column {}", urls.len(), index);
    Ok(urls)
}

/// Loads a URL list. `.csv` files, or any file when a column is named,
/// are read as CSV; everything else as one URL per line.
pub fn read_url_file(path: &Path, column: Option<&str>) -> Result<Vec<String>, CoreError> {
    let text = fs::read_to_string(path)?;
    let is_csv = column.is_some()
        || path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        parse_csv_urls(&text, column)
    } else {
        Ok(parse_url_lines(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audience_core::PrimaryCategory;
    use chrono::NaiveDate;

    fn record(url: &str, title: &str) -> AnalysisRecord {
        AnalysisRecord {
            url: url.to_string(),
            channel_title: title.to_string(),
            subscribers: 1200,
            videos: 34,
            views: 56789,
            primary_category: PrimaryCategory::Kids,
            kids_pct: 67,
            teen_pct: 33,
            serious_pct: 0,
        }
    }

    #[test]
    fn test_export_header_and_rows() {
        let csv = records_to_csv(&[record("https://youtu.be/abc", "Toy Land")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "URL,Channel Title,Subscribers,Videos,Views,Primary Category,Kids %,Teen %,Serious %"
        );
        assert_eq!(lines[1], "https://youtu.be/abc,Toy Land,1200,34,56789,Kids,67,33,0");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_export_quotes_special_fields() {
        let csv = records_to_csv(&[record("https://youtu.be/abc", "Games, \"Fun\" & more")]);
        assert!(csv.contains("\"Games, \"\"Fun\"\" & more\""));

        let rows = parse_csv_rows(&csv);
        assert_eq!(rows[1][1], "Games, \"Fun\" & more");
    }

    #[test]
    fn test_export_empty_results() {
        assert_eq!(records_to_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn test_default_export_file_name() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        assert_eq!(
            default_export_file_name(timestamp),
            "youtube_analysis_20240307_090501.csv"
        );
    }

    #[test]
    fn test_parse_url_lines() {
        let urls = parse_url_lines("  https://youtu.be/a \n\n\r\nhttps://youtu.be/b\r\n   \n");
        assert_eq!(urls, vec!["https://youtu.be/a", "https://youtu.be/b"]);
    }

    #[test]
    fn test_parse_csv_rows_quoting() {
        let rows = parse_csv_rows("a,\"b,c\",\"line\nbreak\"\r\n1,,\"x\"\"y\"\n");
        assert_eq!(
            rows,
            vec![
                vec!["a", "b,c", "line\nbreak"],
                vec!["1", "", "x\"y"],
            ]
        );
    }

    #[test]
    fn test_csv_column_selection() {
        let text = "Campaign,Placement URL,Clicks\n\
                    Spring,https://www.youtube.com/channel/UC1,10\n\
                    \"Summer, EU\",https://youtu.be/vid,3\n\
                    Winter,,0\n";

        let urls = parse_csv_urls(text, Some("placement url")).unwrap();
        assert_eq!(
            urls,
            vec!["https://www.youtube.com/channel/UC1", "https://youtu.be/vid"]
        );

        let first = parse_csv_urls(text, None).unwrap();
        assert_eq!(first, vec!["Spring", "Summer, EU", "Winter"]);

        assert!(matches!(
            parse_csv_urls(text, Some("Missing")),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(parse_csv_urls("", None).is_err());
    }

    #[test]
    fn test_read_url_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let list = dir.path().join("urls.txt");
        fs::write(&list, "https://youtu.be/a\nhttps://youtu.be/b\n").unwrap();
        assert_eq!(read_url_file(&list, None).unwrap().len(), 2);

        let csv = dir.path().join("placements.csv");
        fs::write(&csv, "\u{feff}URL,Note\nhttps://youtu.be/a,\"x, y\"\n").unwrap();
        assert_eq!(
            read_url_file(&csv, None).unwrap(),
            vec!["https://youtu.be/a"]
        );

        let exported = dir.path().join("out.csv");
        write_csv(&exported, &[record("https://youtu.be/a", "Toy Land")]).unwrap();
        assert_eq!(
            read_url_file(&exported, Some("URL")).unwrap(),
            vec!["https://youtu.be/a"]
        );
    }
}
