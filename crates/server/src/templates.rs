//! # HTML Page
//!
//! The single page served by the application: an upload form and, after a
//! successful generation, the escaped result and its download links.

use crate::config::GenerationConfig;
use html_escape::{encode_double_quoted_attribute, encode_text};
use mcqgen::{DocumentKind, McqOutcome};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>MCQ Generator</title>
<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
form { display: grid; gap: 0.75rem; margin-bottom: 2rem; }
pre.mcqs { white-space: pre-wrap; background: #f6f8fa; padding: 1rem; border-radius: 4px; }
.downloads a { margin-right: 1rem; }
</style>
</head>
<body>
<h1>MCQ Generator</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Renders the page, with the result section when `outcome` is present.
pub fn render_page(generation: &GenerationConfig, outcome: Option<&McqOutcome>) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str(&render_form(generation));
    if let Some(outcome) = outcome {
        html.push_str(&render_result(outcome));
    }
    html.push_str(PAGE_TAIL);
    html
}

fn render_form(generation: &GenerationConfig) -> String {
    let accept = DocumentKind::ALL
        .iter()
        .map(|kind| format!(".{kind}"))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        r#"<form action="/generate" method="post" enctype="multipart/form-data">
<label>Document (PDF, TXT or DOCX)
<input type="file" name="file" accept="{accept}" required>
</label>
<label>Number of questions
<input type="number" name="num_questions" min="1" max="{max}" value="{default}">
</label>
<button type="submit">Generate MCQs</button>
</form>
"#,
        max = generation.max_question_count,
        default = generation.default_question_count,
    )
}

fn render_result(outcome: &McqOutcome) -> String {
    let mut section = format!(
        "<section class=\"result\">\n<h2>Generated MCQs</h2>\n<pre class=\"mcqs\">{}</pre>\n",
        encode_text(outcome.result.as_str())
    );

    if !outcome.artifacts.is_empty() {
        section.push_str("<p class=\"downloads\">\n");
        for artifact in &outcome.artifacts {
            section.push_str(&format!(
                "<a href=\"/download/{}\">Download {}</a>\n",
                encode_double_quoted_attribute(&artifact.file_name),
                encode_text(&artifact.kind.to_uppercase()),
            ));
        }
        section.push_str("</p>\n");
    }

    section.push_str("</section>\n");
    section
}
