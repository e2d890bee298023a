/// Table formatting for document listings using comfy-table

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use snote_api::{gallery::Photo, DocId, DocumentRecord};

/// Longest title shown before truncating
const TITLE_WIDTH: usize = 40;

/// Format shared documents as a table
pub fn format_documents_table(documents: &[(DocId, DocumentRecord)]) -> String {
    if documents.is_empty() {
        return "No documents found".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["id", "title", "shared", "views", "size"]);

    for (id, record) in documents {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(truncate(&record.title, TITLE_WIDTH)),
            Cell::new(format_timestamp(record.timestamp)),
            Cell::new(record.views),
            Cell::new(format!("{} B", record.content.len())),
        ]);
    }

    table.to_string()
}

/// Format gallery photos as a table
pub fn format_photos_table(photos: &[Photo]) -> String {
    if photos.is_empty() {
        return "No horizontal photos found".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["id", "size", "ratio", "photographer", "description"]);

    for photo in photos {
        let ratio = photo
            .aspect_ratio()
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&photo.id),
            Cell::new(format!("{}×{}", photo.width, photo.height)),
            Cell::new(ratio),
            Cell::new(&photo.user.name),
            Cell::new(truncate(photo.caption(), TITLE_WIDTH)),
        ]);
    }

    table.to_string()
}

/// Render epoch milliseconds as UTC, falling back to the raw number
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let head: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_documents() {
        assert_eq!(format_documents_table(&[]), "No documents found");
    }

    #[test]
    fn test_format_documents() {
        let mut record = DocumentRecord::new("Trip plan", "<p>Rome</p>", 1609459200000);
        record.views = 7;
        let output = format_documents_table(&[(DocId::from("abc123"), record)]);

        assert!(output.contains("abc123"));
        assert!(output.contains("Trip plan"));
        assert!(output.contains("2021-01-01 00:00:00 UTC"));
        assert!(output.contains("7"));
        assert!(output.contains("11 B"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("ééééé", 5), "ééééé");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}
