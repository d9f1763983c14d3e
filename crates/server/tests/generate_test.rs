//! # Generate Endpoint Tests
//!
//! Drives `POST /generate` end to end: uploads of each document kind, the
//! rejection paths and their status codes, provider failures and concurrent
//! uploads with the same file name.

mod common;

use anyhow::Result;
use common::{download_links, list_dir, TestApp};
use httpmock::prelude::*;
use mcqgen_test_utils::{
    docx_helpers::generate_test_docx, pdf_helpers::generate_test_pdf, MockAiProvider, SAMPLE_MCQS,
};
use reqwest::{multipart, StatusCode};

#[tokio::test]
async fn test_health_and_index() -> Result<()> {
    let app = TestApp::spawn().await?;

    let health = app.get("/health").await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await?, "OK");

    let index = app.get("/").await?;
    assert_eq!(index.status(), StatusCode::OK);
    let html = index.text().await?;
    assert!(html.contains(r#"action="/generate""#));
    assert!(html.contains(r#"name="file""#));
    assert!(html.contains(r#"name="num_questions""#));
    assert!(html.contains(r#"value="5""#));
    assert!(!html.contains("Generated MCQs"));
    Ok(())
}

#[tokio::test]
async fn test_text_upload_end_to_end_through_provider() -> Result<()> {
    let app = TestApp::spawn().await?;
    let response_text = "## MCQ\nQuestion: Is 1 < 2?\nA) Yes\nB) No\nC) Maybe\nD) Never\nCorrect Answer: A";
    let mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("The sky is blue. Water boils at 100C.")
            .body_contains("Generate exactly 3 multiple-choice questions");
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": response_text}}]
        }));
    });

    let response = app
        .post_document(
            "facts.txt",
            b"The sky is blue.\n\nWater boils at 100C.\n".to_vec(),
            Some("3"),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await?;
    mock.assert();

    assert!(html.contains("Generated MCQs"));
    assert!(html.contains("Question: Is 1 &lt; 2?"), "result must be escaped");
    assert!(!html.contains("Is 1 < 2?"));

    let links = download_links(&html);
    assert_eq!(links.len(), 2, "expected txt and pdf links in {links:?}");
    assert!(links.iter().all(|l| l.starts_with("generated_mcqs_facts-")));
    assert_eq!(list_dir(&app.results_dir), {
        let mut sorted = links.clone();
        sorted.sort();
        sorted
    });
    assert_eq!(list_dir(&app.upload_dir).len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_pdf_upload_is_extracted() -> Result<()> {
    let provider = MockAiProvider::new();
    let app = TestApp::spawn_with_provider(Box::new(provider.clone())).await?;
    let pdf = generate_test_pdf(&[
        "The mitochondria is the powerhouse of the cell.",
        "",
        "Ribosomes build proteins.",
    ]);

    let response = app.post_document("biology.pdf", pdf, Some("2")).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    let user_prompt = &calls[0].1;
    assert!(user_prompt.contains("The mitochondria is the powerhouse of the cell."));
    assert!(user_prompt.contains("Ribosomes build proteins."));
    assert!(user_prompt.contains("Generate exactly 2 multiple-choice questions"));
    Ok(())
}

#[tokio::test]
async fn test_docx_upload_is_extracted() -> Result<()> {
    let provider = MockAiProvider::new();
    let app = TestApp::spawn_with_provider(Box::new(provider.clone())).await?;
    let docx = generate_test_docx(&["Photosynthesis uses light.", "Plants release oxygen."])?;

    let response = app.post_document("plants.docx", docx, None).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let user_prompt = provider.get_calls().remove(0).1;
    assert!(user_prompt.contains("Photosynthesis uses light. Plants release oxygen."));
    // No count in the form: the configured default applies.
    assert!(user_prompt.contains("Generate exactly 5 multiple-choice questions"));
    Ok(())
}

#[tokio::test]
async fn test_png_upload_is_rejected_without_side_effects() -> Result<()> {
    let provider = MockAiProvider::new();
    let app = TestApp::spawn_with_provider(Box::new(provider.clone())).await?;

    let response = app
        .post_document("diagram.png", vec![0x89, b'P', b'N', b'G'], Some("3"))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await?.contains("Invalid file type"));
    assert!(list_dir(&app.upload_dir).is_empty());
    assert!(list_dir(&app.results_dir).is_empty());
    assert_eq!(provider.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_document_is_rejected_before_generation() -> Result<()> {
    let provider = MockAiProvider::new();
    let app = TestApp::spawn_with_provider(Box::new(provider.clone())).await?;

    let response = app.post_document("empty.txt", Vec::new(), Some("3")).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .await?
        .contains("does not contain any extractable text"));
    assert_eq!(provider.call_count(), 0);
    assert!(list_dir(&app.results_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_file_part_is_rejected() -> Result<()> {
    let provider = MockAiProvider::new();
    let app = TestApp::spawn_with_provider(Box::new(provider.clone())).await?;

    let response = app
        .post_form(multipart::Form::new().text("num_questions", "3"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await?, "No file has been chosen!");

    // A file part without a file name is what a browser sends for an empty input.
    let response = app.post_document("", Vec::new(), Some("3")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_question_counts_are_rejected() -> Result<()> {
    let provider = MockAiProvider::new();
    let app = TestApp::spawn_with_provider(Box::new(provider.clone())).await?;

    for count in ["0", "-2", "three", "2.5", "21"] {
        let response = app
            .post_document("facts.txt", b"The sky is blue.".to_vec(), Some(count))
            .await?;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "count {count:?} should be rejected"
        );
    }
    assert_eq!(provider.call_count(), 0);

    let response = app
        .post_document("facts.txt", b"The sky is blue.".to_vec(), Some(" 20 "))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_pdf_is_unprocessable() -> Result<()> {
    let provider = MockAiProvider::new();
    let app = TestApp::spawn_with_provider(Box::new(provider.clone())).await?;

    let response = app
        .post_document("broken.pdf", b"definitely not a pdf".to_vec(), Some("3"))
        .await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await?.contains("Failed to extract text"));
    assert_eq!(provider.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_provider_error_is_bad_gateway() -> Result<()> {
    let app = TestApp::spawn().await?;
    let mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).body("quota exhausted");
    });

    let response = app
        .post_document("facts.txt", b"The sky is blue.".to_vec(), Some("1"))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await?;
    assert!(body.contains("quota exhausted"), "body was: {body}");
    // One attempt, no retry.
    mock.assert_hits(1);
    assert!(list_dir(&app.results_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_uploads_with_same_name_do_not_collide() -> Result<()> {
    let provider =
        MockAiProvider::new().with_delay(std::time::Duration::from_millis(50));
    let app = TestApp::spawn_with(
        |config| config.artifacts.pdf = false,
        Some(Box::new(provider.clone())),
    )
    .await?;

    let (first, second) = tokio::join!(
        app.post_document("notes.txt", b"Cats are mammals.".to_vec(), Some("1")),
        app.post_document("notes.txt", b"Sharks are fish.".to_vec(), Some("1")),
    );
    let (first, second) = (first?, second?);
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let first_links = download_links(&first.text().await?);
    let second_links = download_links(&second.text().await?);
    assert_eq!(first_links.len(), 1);
    assert_eq!(second_links.len(), 1);
    assert_ne!(first_links, second_links);

    assert_eq!(list_dir(&app.upload_dir).len(), 2);
    assert_eq!(list_dir(&app.results_dir).len(), 2);
    for link in first_links.iter().chain(&second_links) {
        let content = std::fs::read_to_string(app.results_dir.join(link))?;
        assert_eq!(content, SAMPLE_MCQS);
    }
    Ok(())
}
