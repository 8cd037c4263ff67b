mod auth;
mod snapshot;

pub use auth::TokenManager;
pub use snapshot::SnapshotError;
pub use snapshot::SnapshotManager;
