use chrono::{DateTime, Utc};
use core::time::Duration;

use crate::{id::SnowflakeId, time::duration_to_millis};

impl SnowflakeId {
    /// Recovers the absolute generation time of this ID, assuming it was
    /// generated against `epoch`.
    ///
    /// No validation is performed: decoding a value that did not come from a
    /// generator yields a deterministic but meaningless timestamp, clamped to
    /// the range `chrono` can represent.
    pub fn decode_timestamp_with_epoch(&self, epoch: Duration) -> DateTime<Utc> {
        let millis = self.timestamp().saturating_add(duration_to_millis(epoch));
        DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }
}

/// Recovers the generation time of an ID issued against [`DEFAULT_EPOCH`].
///
/// # Example
///
/// ```
/// use shardflake::{SnowflakeId, decode_timestamp};
///
/// // 2024-03-15T10:00:00Z in Unix milliseconds.
/// let id = SnowflakeId::from_components(1_710_496_800_000, 7, 0);
/// assert_eq!(decode_timestamp(id).to_rfc3339(), "2024-03-15T10:00:00+00:00");
/// ```
///
/// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
pub fn decode_timestamp(id: impl Into<SnowflakeId>) -> DateTime<Utc> {
    decode_timestamp_with_epoch(id, crate::DEFAULT_EPOCH)
}

/// Recovers the generation time of an ID issued against `epoch`.
pub fn decode_timestamp_with_epoch(id: impl Into<SnowflakeId>, epoch: Duration) -> DateTime<Utc> {
    id.into().decode_timestamp_with_epoch(epoch)
}
