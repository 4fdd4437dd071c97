/// A result type defaulting to the crate's [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `shardflake` can produce.
///
/// Every variant surfaces directly to the immediate caller; nothing is
/// retried internally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// No ID is issued for the call. Halting the process is the recommended
    /// response.
    #[error("clock moved backwards: now {now}ms is behind the last issued {last}ms")]
    ClockRegression {
        /// Last timestamp (ms since epoch) an ID was issued for.
        last: i64,
        /// The regressed reading.
        now: i64,
    },

    /// A [`NodeIdResolver`](crate::NodeIdResolver) produced a value that
    /// does not fit the 5-bit node field.
    #[error("node id {node_id} is outside 0..=31")]
    InvalidNodeId {
        /// The rejected node ID.
        node_id: i64,
    },

    /// The entity type is partitioned by key but declares no usable key
    /// field.
    #[error("no partition key field found on `{entity}`")]
    NoPartitionKey {
        /// Base table name of the entity type.
        entity: String,
    },

    /// Partitioning is enabled but no strategy is set.
    #[error("unsupported partition strategy for `{entity}`")]
    UnsupportedStrategy {
        /// Base table name of the entity type.
        entity: String,
    },

    /// A quantity-based partition was configured with zero tables.
    #[error("`{entity}` is partitioned by quantity but has a table count of 0")]
    InvalidTableCount {
        /// Base table name of the entity type.
        entity: String,
    },

    /// The `table_name_format` template is not a valid strftime pattern.
    #[error("invalid table name format `{format}` on `{entity}`")]
    InvalidTableNameFormat {
        /// Base table name of the entity type.
        entity: String,
        /// The rejected template.
        format: String,
    },

    /// The operation failed because the generator lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
