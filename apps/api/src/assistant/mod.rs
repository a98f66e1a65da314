// Job-post drafting assistant: field validation, skill/level inference and
// LLM-written summaries and advice.

pub mod handlers;
pub mod job_draft;
pub mod prompts;
pub mod service;
