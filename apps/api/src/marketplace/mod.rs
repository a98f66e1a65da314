// Marketplace entities: thin persistence over the hosted Postgres tables.
// Each entity module owns its request types and queries; handlers.rs adapts them to HTTP.

pub mod applications;
pub mod handlers;
pub mod jobs;
pub mod messages;
pub mod profiles;
pub mod projects;
pub mod skills;
pub mod validation;
