pub mod locks;
pub mod providers;
pub mod saved_movies;
pub mod search_telemetry;
pub mod users;

pub use locks::KeyedLocks;
pub use providers::{MovieCatalog, TmdbCatalog};
pub use saved_movies::{SkipReason, UnsaveOutcome};
