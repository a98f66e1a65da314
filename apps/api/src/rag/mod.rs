// Retrieval-augmented answering over the knowledge_base table.
// Flow: embed prompt → match_knowledge → join context → Gemini.

pub mod documents;
pub mod embedder;
pub mod handlers;
pub mod pipeline;
pub mod retrieval;
pub mod sync;
