//! # MCQ Prompts
//!
//! The default templates for multiple-choice question generation and the pure
//! function that fills them in. Both templates can be overridden by the server
//! configuration.

/// The system prompt that sets the persona for question generation.
pub const MCQ_SYSTEM_PROMPT: &str = "You are an expert educator who writes clear, unambiguous multiple-choice questions. Every question must be answerable from the provided text alone. Output only the questions in the requested format, with no introduction or closing remarks.";

/// The default user prompt for question generation.
///
/// Placeholders: `{count}`, `{text}`
pub const MCQ_USER_PROMPT: &str = r#"Generate exactly {count} multiple-choice questions from the following text.

Each question must have exactly four options labeled A) to D) and exactly one correct answer.
Use this format for every question. Each one starts with its own ## MCQ line:

## MCQ
Question: [question]
A) [option A]
B) [option B]
C) [option C]
D) [option D]
Correct Answer: [letter of the correct option]

# TEXT
{text}
"#;

/// Builds the user prompt from the default template.
pub fn build_mcq_prompt(text: &str, count: u32) -> String {
    render_mcq_template(MCQ_USER_PROMPT, text, count)
}

/// Fills a `{count}`/`{text}` template.
///
/// `{count}` is substituted first so that the document text is embedded
/// verbatim, even when it happens to contain placeholder-like sequences.
pub fn render_mcq_template(template: &str, text: &str, count: u32) -> String {
    let with_count = template.replace("{count}", &count.to_string());
    match with_count.split_once("{text}") {
        Some((head, tail)) => format!("{head}{text}{tail}"),
        None => format!("{with_count}\n\n{text}"),
    }
}

/// The pair of prompts handed to the provider for one request.
#[derive(Debug, Clone)]
pub struct McqPrompts {
    pub system_prompt: String,
    pub user_prompt_template: String,
}

impl Default for McqPrompts {
    fn default() -> Self {
        Self {
            system_prompt: MCQ_SYSTEM_PROMPT.to_string(),
            user_prompt_template: MCQ_USER_PROMPT.to_string(),
        }
    }
}

impl McqPrompts {
    pub fn user_prompt(&self, text: &str, count: u32) -> String {
        render_mcq_template(&self.user_prompt_template, text, count)
    }
}
