use httpmock::prelude::*;
use lectern::config::{Config, EngineConfig};
use lectern::processing::{
    FALLBACK_NOTE, LengthPreset, RequestError, SummaryProvider, SummaryService,
};
use lectern::storage::LocateError;
use serde_json::json;
use std::io::{Cursor, Write};
use std::path::Path;

const MODEL: &str = "test-org/lecture-bart";
const SENTENCE: &str = "Entropy counts microstates behind any macrostate. ";

fn config_for(server: Option<&MockServer>, uploads: &Path) -> Config {
    let engine = match server {
        Some(server) => EngineConfig {
            api_key: Some("test-token".into()),
            model: MODEL.into(),
            base_url: server.url("/models"),
        },
        None => EngineConfig::default(),
    };
    Config {
        engine,
        uploads_dir: uploads.to_path_buf(),
        ..Config::default()
    }
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{body}</w:body></w:document>"
    );
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .expect("start entry");
        zip.write_all(xml.as_bytes()).expect("write entry");
        zip.finish().expect("finish zip");
    }
    buf
}

#[tokio::test]
async fn short_upload_is_summarized_in_one_engine_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{MODEL}"))
                .header("authorization", "Bearer test-token")
                .json_body_partial(r#"{"parameters":{"min_length":80,"max_length":250}}"#);
            then.status(200)
                .json_body(json!([{ "summary_text": "Entropy measures disorder." }]));
        })
        .await;

    let uploads = tempfile::tempdir().expect("tempdir");
    std::fs::write(uploads.path().join("week1.txt"), SENTENCE.repeat(10)).expect("write");
    let service =
        SummaryService::new(&config_for(Some(&server), uploads.path())).expect("service");

    let result = service
        .summarize_upload("/uploads/week1.txt", Some("text/plain"), LengthPreset::Short)
        .await
        .expect("summary");

    mock.assert_hits_async(1).await;
    assert_eq!(result.provider, SummaryProvider::External);
    assert_eq!(result.text, "Entropy measures disorder.");
    assert_eq!(result.length, LengthPreset::Short);
}

#[tokio::test]
async fn long_upload_runs_map_then_reduce() {
    let server = MockServer::start_async().await;
    let chunk_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{MODEL}"))
                .json_body_partial(r#"{"parameters":{"min_length":160,"max_length":600}}"#);
            then.status(200)
                .json_body(json!([{ "summary_text": "Partial summary." }]));
        })
        .await;
    let reduce_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{MODEL}"))
                .json_body_partial(r#"{"parameters":{"min_length":280,"max_length":900}}"#);
            then.status(200)
                .json_body(json!({ "summary_text": "Final lecture summary." }));
        })
        .await;

    let uploads = tempfile::tempdir().expect("tempdir");
    std::fs::write(uploads.path().join("week2.txt"), SENTENCE.repeat(200)).expect("write");
    let service =
        SummaryService::new(&config_for(Some(&server), uploads.path())).expect("service");

    let result = service
        .summarize_upload("/uploads/week2.txt", None, LengthPreset::Long)
        .await
        .expect("summary");

    chunk_mock.assert_hits_async(4).await;
    reduce_mock.assert_hits_async(1).await;
    assert_eq!(result.provider, SummaryProvider::External);
    assert_eq!(result.text, "Final lecture summary.");
    assert_eq!(service.metrics_snapshot().engine_calls, 5);
}

#[tokio::test]
async fn engine_outage_degrades_to_fallback_with_note() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{MODEL}"));
            then.status(503).body("Model is currently loading");
        })
        .await;

    let uploads = tempfile::tempdir().expect("tempdir");
    std::fs::write(uploads.path().join("week3.txt"), SENTENCE.repeat(200)).expect("write");
    let service =
        SummaryService::new(&config_for(Some(&server), uploads.path())).expect("service");

    let result = service
        .summarize_upload("/uploads/week3.txt", None, LengthPreset::Medium)
        .await
        .expect("fallback summary");

    mock.assert_hits_async(1).await;
    assert_eq!(result.provider, SummaryProvider::Fallback);
    assert!(result.text.starts_with("TL;DR:"));
    assert!(result.text.ends_with(FALLBACK_NOTE));
}

#[tokio::test]
async fn docx_upload_without_credential_uses_fallback() {
    let uploads = tempfile::tempdir().expect("tempdir");
    let docx = docx_bytes(&[
        "Photosynthesis converts light energy into chemical energy.",
        "Chlorophyll absorbs light in the blue and red wavelengths.",
        "The Calvin cycle fixes carbon dioxide into sugars.",
    ]);
    std::fs::write(uploads.path().join("bio.docx"), docx).expect("write");
    let service = SummaryService::new(&config_for(None, uploads.path())).expect("service");

    let result = service
        .summarize_upload(
            "/uploads/bio.docx",
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            LengthPreset::Short,
        )
        .await
        .expect("fallback summary");

    assert_eq!(result.provider, SummaryProvider::Fallback);
    assert!(result.text.contains("Photosynthesis converts light energy"));
    assert!(result.text.contains("Key Points:"));
    assert!(!result.text.contains("(Note:"));
    assert_eq!(service.metrics_snapshot().fallback_summaries, 1);
}

#[tokio::test]
async fn unknown_upload_is_reported_before_any_engine_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200)
                .json_body(json!([{ "summary_text": "unused" }]));
        })
        .await;

    let uploads = tempfile::tempdir().expect("tempdir");
    let service =
        SummaryService::new(&config_for(Some(&server), uploads.path())).expect("service");

    let error = service
        .summarize_upload("/uploads/missing.pdf", None, LengthPreset::Medium)
        .await
        .unwrap_err();

    assert!(matches!(error, RequestError::Locate(LocateError::Missing(_))));
    mock.assert_hits_async(0).await;
}
