//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the `mcqgen` library.

pub mod mcq;
