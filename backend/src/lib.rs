//! Career Agent Backend
//!
//! Collaborators around the career engine:
//! - Document store (SQLite, or in-memory for tests)
//! - Activity timeline of everything a learner did
//! - Identity provider and environment configuration
//! - `CareerService`, which the `career-agent` CLI drives

pub mod config;
pub mod identity;
pub mod memory;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use identity::{EnvIdentity, IdentityError, IdentityProvider, StaticIdentity};
pub use memory::{CareerMemory, MemoryEvent, MemoryEventType, MemoryStore};
pub use service::{CareerService, ServiceError, ServiceResult, TrackExploration};
pub use store::{DocumentStore, InMemoryStore, SqliteStore, StoreError};
