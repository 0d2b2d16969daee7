pub mod analytics;
pub mod books;
pub mod dates;
pub mod errors;
pub mod formatting;
pub mod ids;
pub mod preferences;
pub mod repositories;

// Re-exports
pub use analytics::{calculator, stats};
pub use errors::RepositoryError;
