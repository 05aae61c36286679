mod favorites;
mod forums;
mod schema;
mod types;

pub use forums::SyncStats;
pub use schema::Database;
pub use types::{DatabaseError, ForumRecord, ForumUpsert, GroupUpsert};
