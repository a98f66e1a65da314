// Job/freelancer compatibility: pure scoring, ranked matching over the database,
// and the persisted `matches` records.

pub mod handlers;
pub mod scoring;
pub mod service;
