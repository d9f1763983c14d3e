//! # MCQ Prompt Tests
//!
//! Validates that the prompt builder embeds the document verbatim, asks for the
//! exact number of questions and spells out the output grammar.

use mcqgen::prompts::mcq::{
    build_mcq_prompt, render_mcq_template, McqPrompts, MCQ_SYSTEM_PROMPT, MCQ_USER_PROMPT,
};

#[test]
fn test_prompt_embeds_full_text_and_count() {
    let text = "The sky is blue. Water boils at 100C.";
    let prompt = build_mcq_prompt(text, 3);

    assert!(prompt.contains(text));
    assert!(prompt.contains("Generate exactly 3 multiple-choice questions"));
    assert!(!prompt.contains("{count}"));
    assert!(!prompt.contains("{text}"));
}

#[test]
fn test_prompt_states_the_output_grammar() {
    let prompt = build_mcq_prompt("Some text.", 5);
    for marker in [
        "## MCQ",
        "Question:",
        "A)",
        "B)",
        "C)",
        "D)",
        "Correct Answer:",
    ] {
        assert!(prompt.contains(marker), "missing marker '{marker}'");
    }
}

#[test]
fn test_prompt_is_deterministic() {
    let text = "Rust has ownership and borrowing.";
    assert_eq!(build_mcq_prompt(text, 4), build_mcq_prompt(text, 4));
}

/// Placeholder-looking sequences inside the document must survive untouched.
#[test]
fn test_text_with_placeholders_is_embedded_verbatim() {
    let text = "Templates use {count} and {text} as placeholders.";
    let prompt = build_mcq_prompt(text, 2);

    assert!(prompt.contains(text));
    assert!(prompt.contains("Generate exactly 2 multiple-choice questions"));
}

#[test]
fn test_custom_template_without_text_placeholder_appends_text() {
    let prompt = render_mcq_template("Write {count} questions.", "Body text.", 7);
    assert_eq!(prompt, "Write 7 questions.\n\nBody text.");
}

#[test]
fn test_default_prompts_use_library_templates() {
    let prompts = McqPrompts::default();
    assert_eq!(prompts.system_prompt, MCQ_SYSTEM_PROMPT);
    assert_eq!(prompts.user_prompt_template, MCQ_USER_PROMPT);
    assert_eq!(prompts.user_prompt("abc", 1), build_mcq_prompt("abc", 1));
}

#[test]
fn test_default_template_is_complete() {
    assert!(MCQ_USER_PROMPT.starts_with("Generate exactly {count} multiple-choice questions"));
    assert!(MCQ_USER_PROMPT.contains("Each one starts with its own ## MCQ line:\n\n## MCQ\nQuestion: [question]\n"));
    assert!(MCQ_USER_PROMPT.contains("Correct Answer: [letter of the correct option]\n"));
    assert!(MCQ_USER_PROMPT.ends_with("# TEXT\n{text}\n"));
}
