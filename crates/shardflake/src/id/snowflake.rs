use core::fmt;

/// A 64-bit Snowflake ID with a 5-bit node field.
///
/// - 1 bit reserved (always zero for generated IDs)
/// - 46 bits timestamp (ms since the generator's epoch)
/// - 5 bits node ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            17 16          12 11             0
///              +--------------+----------------+--------------+---------------+
///  Field:      | reserved (1) | timestamp (46) | node ID (5)  | sequence (12) |
///              +--------------+----------------+--------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB --------->|
/// ```
///
/// The raw value is signed so it maps directly onto a `BIGINT` column. For a
/// fixed node, IDs issued in the same millisecond increase by sequence and
/// IDs issued in later milliseconds increase by timestamp, so the whole value
/// increases monotonically.
///
/// # Example
///
/// ```
/// use shardflake::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.node_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.to_raw(), (1000 << 17) | (2 << 12) | 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: i64,
}

impl SnowflakeId {
    /// Bitmask for the 46-bit timestamp field. Occupies bits 17 through 62.
    pub const TIMESTAMP_MASK: i64 = (1 << 46) - 1;

    /// Bitmask for the 5-bit node ID field. Occupies bits 12 through 16.
    pub const NODE_ID_MASK: i64 = (1 << 5) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: i64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (node + sequence
    /// bits).
    pub const TIMESTAMP_SHIFT: u32 = 17;

    /// Number of bits to shift the node ID to its position.
    pub const NODE_ID_SHIFT: u32 = 12;

    /// Largest node ID that fits the layout.
    pub const MAX_NODE_ID: i64 = Self::NODE_ID_MASK;

    /// Largest sequence value per millisecond.
    pub const MAX_SEQUENCE: i64 = Self::SEQUENCE_MASK;

    /// Packs the three components into an ID. Each component is masked to its
    /// field width.
    pub const fn from_components(timestamp: i64, node_id: i64, sequence: i64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let node_id = (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        let sequence = sequence & Self::SEQUENCE_MASK;
        Self {
            id: timestamp | node_id | sequence,
        }
    }

    /// Wraps a raw value without validation.
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw 64-bit value.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Extracts the timestamp (ms since epoch) by dropping the node and
    /// sequence bits.
    ///
    /// No masking is applied, so a raw value that was not produced by a
    /// generator still decodes deterministically.
    pub const fn timestamp(&self) -> i64 {
        self.id >> Self::TIMESTAMP_SHIFT
    }

    /// Extracts the node ID.
    pub const fn node_id(&self) -> i64 {
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Extracts the sequence.
    pub const fn sequence(&self) -> i64 {
        self.id & Self::SEQUENCE_MASK
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<i64> for SnowflakeId {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
