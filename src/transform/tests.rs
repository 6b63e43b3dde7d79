//! Tests for transform module

use super::*;
use crate::error::Error;
use crate::frame::Frame;
use crate::output::read_parquet;
use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str = "video_id,title,publishedAt,channelTitle,categoryId,trending_date,tags,view_count,likes,dislikes,comment_count,comments_disabled,ratings_disabled,description";

fn video_row(id: &str, category: i64) -> String {
    format!(
        "{id},Title {id},2020-08-11T19:20:14Z,Channel,{category},2020-08-12T00:00:00Z,a|b,100,10,1,5,False,False,\"about {id}\nsecond line\""
    )
}

fn write_csv(dir: &Path, name: &str, rows: &[String]) {
    let mut body = String::from(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    std::fs::write(dir.join(name), body).unwrap();
}

fn write_categories(dir: &Path, name: &str, items: serde_json::Value) {
    let body = json!({"kind": "youtube#videoCategoryListResponse", "items": items});
    std::fs::write(dir.join(name), body.to_string()).unwrap();
}

fn category(id: &str, title: &str) -> serde_json::Value {
    json!({"kind": "youtube#videoCategory", "id": id, "snippet": {"title": title, "assignable": true}})
}

// ============================================================================
// Category Lookup Tests
// ============================================================================

#[test]
fn test_lookup_first_occurrence_wins() {
    let lookup = CategoryLookup::from_entries(&[
        category("1", "Music"),
        category("2", "Gaming"),
        category("2", "GamingV2"),
    ])
    .unwrap();

    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.get(1), Some("Music"));
    assert_eq!(lookup.get(2), Some("Gaming"));
    assert_eq!(
        lookup.iter().collect::<Vec<_>>(),
        vec![(1, "Music"), (2, "Gaming")]
    );
}

#[test]
fn test_lookup_exact_duplicates_collapse() {
    let entries = vec![category("10", "Music"), category("10", "Music")];
    let lookup = CategoryLookup::from_entries(&entries).unwrap();
    assert_eq!(lookup.len(), 1);
}

#[test]
fn test_lookup_numeric_id() {
    let lookup =
        CategoryLookup::from_entries(&[json!({"id": 24, "snippet": {"title": "Entertainment"}})])
            .unwrap();
    assert_eq!(lookup.get(24), Some("Entertainment"));
}

#[test]
fn test_lookup_bad_id() {
    let err = CategoryLookup::from_entries(&[category("music", "Music")]).unwrap_err();
    assert!(matches!(err, Error::Coercion { ref column, .. } if column == "id"));
}

#[test]
fn test_lookup_missing_title() {
    let err = CategoryLookup::from_entries(&[json!({"id": "1", "snippet": {}})]).unwrap_err();
    assert!(matches!(err, Error::RecordExtraction { .. }));
}

// ============================================================================
// Enrich Tests
// ============================================================================

#[test]
fn test_enrich_left_join_keeps_unmatched_rows() {
    let frame = Frame::from_rows(
        vec!["video_id".to_string(), "categoryId".to_string()],
        vec![
            vec![Some("a".to_string()), Some("1".to_string())],
            vec![Some("b".to_string()), Some("99".to_string())],
            vec![Some("c".to_string()), None],
            vec![Some("d".to_string()), Some("1".to_string())],
        ],
    )
    .unwrap();
    let mut lookup = CategoryLookup::default();
    lookup.insert(1, "Music");

    let enriched = enrich(frame, &lookup).unwrap();

    assert_eq!(enriched.num_rows(), 4);
    assert_eq!(enriched.columns().last().map(String::as_str), Some(CATEGORY_COLUMN));
    assert_eq!(
        enriched.column(CATEGORY_COLUMN).unwrap(),
        vec![Some("Music"), None, None, Some("Music")]
    );
    assert_eq!(
        enriched.column("video_id").unwrap(),
        vec![Some("a"), Some("b"), Some("c"), Some("d")]
    );
}

#[test]
fn test_enrich_requires_category_id() {
    let frame = Frame::new(vec!["video_id".to_string()]);
    let err = enrich(frame, &CategoryLookup::default()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { .. }));
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_directory_counts_and_skips() {
    let dir = tempdir().unwrap();
    write_csv(dir.path(), "US_youtube_trending_data.csv", &[video_row("a", 1)]);
    write_categories(dir.path(), "US_category_id.json", json!([category("1", "Music")]));
    std::fs::write(dir.path().join("README.txt"), "not data").unwrap();
    std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

    let merged = merge_directory(dir.path(), TextEncoding::Latin1).unwrap();

    assert_eq!(merged.tabular_files, 1);
    assert_eq!(merged.nested_files, 1);
    assert_eq!(merged.frame.num_rows(), 1);
    assert_eq!(merged.categories.len(), 1);
    // Quoted newline stays inside the field
    assert_eq!(
        merged.frame.value(0, "description"),
        Some("about a\nsecond line")
    );
}

#[test]
fn test_merge_directory_latin1_input() {
    let dir = tempdir().unwrap();
    let mut bytes = format!("{HEADER}\n").into_bytes();
    bytes.extend_from_slice(
        b"x,Caf\xe9,2020-08-11T19:20:14Z,Ch,1,2020-08-12T00:00:00Z,,1,1,0,0,False,False,\n",
    );
    std::fs::write(dir.path().join("FR_youtube_trending_data.csv"), bytes).unwrap();

    let merged = merge_directory(dir.path(), TextEncoding::Latin1).unwrap();
    assert_eq!(merged.frame.value(0, "title"), Some("Café"));
}

#[test]
fn test_merge_directory_missing() {
    let dir = tempdir().unwrap();
    let err = merge_directory(&dir.path().join("absent"), TextEncoding::Latin1).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_merge_directory_rejects_empty_csv() {
    let dir = tempdir().unwrap();
    write_csv(dir.path(), "US_youtube_trending_data.csv", &[video_row("a", 1)]);
    std::fs::write(dir.path().join("EMPTY_youtube_trending_data.csv"), b"").unwrap();

    let err = merge_directory(dir.path(), TextEncoding::Latin1).unwrap_err();
    match err {
        Error::Decode { source_name, .. } => {
            assert_eq!(source_name, "EMPTY_youtube_trending_data.csv");
        }
        other => panic!("Expected decode error, got {other:?}"),
    }
}

#[test]
fn test_merge_directory_json_without_items() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("US_category_id.json"), r#"{"kind": "x"}"#).unwrap();
    let err = merge_directory(dir.path(), TextEncoding::Latin1).unwrap_err();
    assert!(matches!(err, Error::RecordExtraction { .. }));
}

// ============================================================================
// End-to-end Transform Tests
// ============================================================================

#[test]
fn test_transform_two_regions() {
    let dir = tempdir().unwrap();
    write_csv(
        dir.path(),
        "US_youtube_trending_data.csv",
        &[video_row("a", 1), video_row("b", 2), video_row("c", 1)],
    );
    write_csv(
        dir.path(),
        "GB_youtube_trending_data.csv",
        &[video_row("d", 2), video_row("e", 2)],
    );
    write_categories(
        dir.path(),
        "US_category_id.json",
        json!([
            category("1", "Music"),
            category("2", "Gaming"),
            category("2", "GamingV2")
        ]),
    );

    let output = dir.path().join("All_YT_Data.parquet");
    let report = transform_directory(dir.path(), &output, &TransformOptions::default()).unwrap();

    assert_eq!(
        report,
        TransformReport {
            tabular_files: 2,
            nested_files: 1,
            rows: 5,
            categories: 2,
            output: output.clone(),
        }
    );

    let batches = read_parquet(&output, None).unwrap();
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 5);

    let schema = batch.schema();
    assert!(schema.field_with_name(DESCRIPTION_COLUMN).is_err());
    for column in ["categoryId", "view_count", "likes", "dislikes", "comment_count"] {
        assert_eq!(
            schema.field_with_name(column).unwrap().data_type(),
            &DataType::Int64,
            "{column}"
        );
    }

    let ids = batch
        .column_by_name("categoryId")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    let titles = batch
        .column_by_name("category")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    for row in 0..batch.num_rows() {
        let expected = match ids.value(row) {
            1 => "Music",
            2 => "Gaming",
            other => panic!("unexpected categoryId {other}"),
        };
        assert!(!titles.is_null(row));
        assert_eq!(titles.value(row), expected);
    }
}

#[test]
fn test_transform_requires_description() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("US_youtube_trending_data.csv"),
        "video_id,categoryId\nabc,1\n",
    )
    .unwrap();

    let err = transform_directory(
        dir.path(),
        &dir.path().join("out.parquet"),
        &TransformOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column } if column == DESCRIPTION_COLUMN));
    assert!(!dir.path().join("out.parquet").exists());
}

#[test]
fn test_transform_rejects_bad_counts_before_writing() {
    let dir = tempdir().unwrap();
    write_csv(
        dir.path(),
        "US_youtube_trending_data.csv",
        &[video_row("a", 1).replace(",100,", ",lots,")],
    );

    let output = dir.path().join("out.parquet");
    let err = transform_directory(dir.path(), &output, &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Coercion { ref column, .. } if column == "view_count"));
    assert!(!output.exists());
}
