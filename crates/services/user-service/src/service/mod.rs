//! Service layer - business use cases.

mod user_sync;

pub use user_sync::{UserSync, UserSynchronizer};
