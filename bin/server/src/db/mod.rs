//! Postgres implementations of the store contracts.
//!
//! Repositories own a `PgPool`, run runtime-checked queries, and map
//! TEXT-stored ids back into the typed ids through `FromRow` row
//! structs.

pub mod conversation;
pub mod message;
pub mod profile;
pub mod task;

pub use conversation::PgConversationStore;
pub use message::PgMessageStore;
pub use profile::PgProfileStore;
pub use task::PgTaskStore;
