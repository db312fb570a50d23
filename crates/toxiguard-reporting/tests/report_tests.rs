//! Reports over a file-backed store

use std::sync::Arc;
use tempfile::TempDir;
use toxiguard_core::{Author, CommentRecord, Label};
use toxiguard_reporting::{ExportFormat, Reporter};
use toxiguard_store::{CommentQuery, CommentStore, JsonlCommentStore};

fn seed(store: &dyn CommentStore) {
    let rows = [
        ("Tech Enthusiast", "Great write-up, thanks", Label::NonToxic),
        ("Code Ninja", "You are stupid", Label::Toxic),
        ("Code Ninja", "Stupid, stupid idea", Label::Toxic),
        ("Pixel Pioneer", "Agreed, nice work", Label::NonToxic),
    ];
    for (author, text, label) in rows {
        store
            .append(CommentRecord::accepted(&Author::new(author), text, label, Some(0.5)))
            .unwrap();
    }
}

#[test]
fn test_reports_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("comments.jsonl");

    {
        let store = JsonlCommentStore::open_path(&path).unwrap();
        seed(&store);
    }

    let reporter = Reporter::new(Arc::new(JsonlCommentStore::open_path(&path).unwrap()));

    let overview = reporter.overview().unwrap();
    assert_eq!((overview.total, overview.toxic, overview.non_toxic), (4, 2, 2));

    let activity = reporter.author_activity().unwrap();
    let ninja = activity.iter().find(|a| a.author == "Code Ninja").unwrap();
    assert_eq!((ninja.total_comments, ninja.toxic_comments), (2, 2));

    let terms = reporter.top_terms(1).unwrap();
    assert_eq!(terms[0].term, "stupid");
    assert_eq!(terms[0].count, 3);

    let toxic = reporter.toxic_comments().unwrap();
    assert_eq!(toxic.len(), 2);
    assert!(toxic.iter().all(|r| r.label == Label::Toxic));
}

#[test]
fn test_export_filtered_csv_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonlCommentStore::open_path(temp_dir.path().join("c.jsonl")).unwrap());
    seed(store.as_ref());
    let reporter = Reporter::new(store);

    let export_path = temp_dir.path().join("export.csv");
    let file = std::fs::File::create(&export_path).unwrap();
    let rows = reporter
        .export(&CommentQuery::new().label(Label::Toxic), ExportFormat::Csv, file)
        .unwrap();
    assert_eq!(rows, 2);

    let content = std::fs::read_to_string(&export_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].contains("\"Stupid, stupid idea\""));
}
