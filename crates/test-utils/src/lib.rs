use mcqgen::errors::PromptError;
use mcqgen::providers::ai::AiProvider;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A sample generation result in the format the MCQ prompt asks for.
pub const SAMPLE_MCQS: &str = "## MCQ\nQuestion: What color is the sky?\nA) Green\nB) Blue\nC) Red\nD) Yellow\nCorrect Answer: B\n\n## MCQ\nQuestion: At what temperature does water boil?\nA) 50C\nB) 75C\nC) 100C\nD) 150C\nCorrect Answer: C";

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
enum MockReply {
    Text(String),
    Error(String),
}

/// A deterministic stand-in for a real provider.
///
/// Clones share their state, so a test can hand a clone to the pipeline and
/// inspect the recorded calls afterwards.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    reply: Arc<Mutex<MockReply>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
    delay: Option<Duration>,
}

impl MockAiProvider {
    /// A provider that answers every prompt with [`SAMPLE_MCQS`].
    pub fn new() -> Self {
        Self::with_response(SAMPLE_MCQS)
    }

    pub fn with_response(response: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new(MockReply::Text(response.to_string()))),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// A provider whose every call fails with `PromptError::AiApi(message)`.
    pub fn failing(message: &str) -> Self {
        let provider = Self::new();
        *provider.reply.lock().unwrap() = MockReply::Error(message.to_string());
        provider
    }

    /// Delays each answer, which lets tests overlap concurrent requests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.reply.lock().unwrap().clone();
        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(PromptError::AiApi(message)),
        }
    }
}

// --- Test-Specific Helpers ---

#[cfg(feature = "pdf")]
pub mod pdf_helpers {
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    /// Generates a PDF with one page per entry of `pages`, each page showing one
    /// line of text per entry line. An empty entry yields a page without text.
    pub fn generate_test_pdf(pages: &[&str]) -> Vec<u8> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let font_name = Name(b"F1");

        let page_ids: Vec<Ref> = (0..pages.len())
            .map(|i| Ref::new(10 + 2 * i as i32))
            .collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(pages.len() as i32);
        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        for (page_id, text) in page_ids.iter().zip(pages) {
            let content_id = Ref::new(page_id.get() + 1);

            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources().fonts().pair(font_name, font_id);
            page.finish();

            let mut content = Content::new();
            if !text.is_empty() {
                content.begin_text();
                content.set_font(font_name, 12.0);
                content.next_line(72.0, 770.0);
                for line in text.lines() {
                    content.show(Str(line.as_bytes()));
                    content.next_line(0.0, -16.0);
                }
                content.end_text();
            }
            pdf.stream(content_id, &content.finish());
        }

        pdf.finish()
    }

    /// Generates a one-page PDF whose only line is a single `TJ` array. Each
    /// segment is shown and then followed by its adjustment, in thousandths of
    /// the font size; negative values move the next glyph to the right.
    pub fn generate_positioned_pdf(segments: &[(&str, f32)]) -> Vec<u8> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let page_id = Ref::new(4);
        let content_id = Ref::new(5);
        let font_name = Name(b"F1");

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);
        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(font_name, font_id);
        page.finish();

        let mut content = Content::new();
        content.begin_text();
        content.set_font(font_name, 12.0);
        content.next_line(72.0, 770.0);
        {
            let mut shown = content.show_positioned();
            let mut items = shown.items();
            for (text, adjustment) in segments {
                items.show(Str(text.as_bytes()));
                if *adjustment != 0.0 {
                    items.adjust(*adjustment);
                }
            }
        }
        content.end_text();
        pdf.stream(content_id, &content.finish());

        pdf.finish()
    }
}

#[cfg(feature = "docx")]
pub mod docx_helpers {
    use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};
    use std::io::Cursor;

    /// Generates a DOCX document with one paragraph per entry.
    pub fn generate_test_docx(paragraphs: &[&str]) -> anyhow::Result<Vec<u8>> {
        let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
            docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
        });
        pack(docx)
    }

    /// Generates a DOCX document with a single paragraph whose middle part is
    /// an internal hyperlink: `before`, then `link_text` inside the link, then `after`.
    pub fn generate_linked_docx(
        before: &str,
        link_text: &str,
        after: &str,
    ) -> anyhow::Result<Vec<u8>> {
        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text(before))
            .add_hyperlink(
                Hyperlink::new("glossary", HyperlinkType::Anchor)
                    .add_run(Run::new().add_text(link_text)),
            )
            .add_run(Run::new().add_text(after));
        pack(Docx::new().add_paragraph(paragraph))
    }

    fn pack(docx: Docx) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to pack test DOCX: {e:?}"))?;
        Ok(buffer.into_inner())
    }
}
