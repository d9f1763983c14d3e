use mcqgen::{
    artifacts::{artifact_file_name, ArtifactRenderer, ArtifactWriter, TextRenderer},
    storage::{sanitize_file_name, storage_key, UploadStore, FALLBACK_FILE_NAME},
    ArtifactError, DocumentKind, UploadedDocument,
};
use std::collections::HashSet;
use tempfile::tempdir;

#[test]
fn test_sanitize_strips_directories_and_unsafe_characters() {
    assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_file_name("C:\\Users\\me\\notes.txt"), "notes.txt");
    assert_eq!(sanitize_file_name("my  lecture notes.pdf"), "my_lecture_notes.pdf");
    assert_eq!(sanitize_file_name("bad\u{0}name\n.docx"), "badname.docx");
    assert_eq!(sanitize_file_name("résumé (final).docx"), "rsum_final.docx");
    assert_eq!(sanitize_file_name(".hidden.txt"), "hidden.txt");
}

#[test]
fn test_sanitize_falls_back_when_nothing_is_left() {
    for name in ["", "..", "../", "///", "???"] {
        assert_eq!(sanitize_file_name(name), FALLBACK_FILE_NAME, "input {name:?}");
    }
}

#[test]
fn test_storage_keys_are_sanitized_and_unique() {
    let keys: HashSet<String> = (0..50).map(|_| storage_key("../My Notes.pdf")).collect();
    assert_eq!(keys.len(), 50);
    for key in &keys {
        let (stem, suffix) = key.rsplit_once('-').unwrap();
        assert_eq!(stem, "My_Notes");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[tokio::test]
async fn test_upload_store_creates_dir_and_writes_bytes() {
    let dir = tempdir().unwrap();
    let store = UploadStore::new(dir.path().join("nested").join("uploads"));

    let document = UploadedDocument::new("../facts.txt", "The sky is blue.");
    let stored = store.save(&document, DocumentKind::Txt).await.unwrap();

    assert!(stored.path.starts_with(store.dir()));
    assert!(stored.key.starts_with("facts-"));
    assert_eq!(
        stored.path.file_name().unwrap().to_str().unwrap(),
        format!("{}.txt", stored.key)
    );
    assert_eq!(std::fs::read(&stored.path).unwrap(), b"The sky is blue.");

    store.remove(&stored).await.unwrap();
    assert!(!stored.path.exists());
    // Removing twice is fine.
    store.remove(&stored).await.unwrap();
}

#[tokio::test]
async fn test_artifact_writer_writes_every_renderer() {
    let dir = tempdir().unwrap();
    let writer = ArtifactWriter::new(dir.path().join("results")).with_renderer(TextRenderer);

    let artifacts = writer.write_all("facts-0123abcd", "## MCQ\nQuestion: ?").await;

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].kind, "txt");
    assert_eq!(artifacts[0].file_name, "generated_mcqs_facts-0123abcd.txt");
    assert_eq!(
        std::fs::read_to_string(&artifacts[0].path).unwrap(),
        "## MCQ\nQuestion: ?"
    );
}

#[derive(Debug)]
struct BrokenRenderer;

impl ArtifactRenderer for BrokenRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, _content: &str) -> Result<Vec<u8>, ArtifactError> {
        Err(ArtifactError::Render("boom".to_string()))
    }
}

#[tokio::test]
async fn test_failing_renderer_does_not_roll_back_others() {
    let dir = tempdir().unwrap();
    let writer = ArtifactWriter::new(dir.path())
        .with_renderer(TextRenderer)
        .with_renderer(BrokenRenderer);

    let artifacts = writer.write_all("key", "content").await;

    assert_eq!(artifacts.len(), 1);
    assert!(dir.path().join(artifact_file_name("key", "txt")).exists());
    assert!(!dir.path().join(artifact_file_name("key", "pdf")).exists());
}
