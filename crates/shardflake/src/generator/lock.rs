use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{Mutex, SnowflakeGenerator},
    id::SnowflakeId,
    node::{LocalIpNodeId, NodeIdResolver},
    time::TimeSource,
};

/// Mutable generator state. Only ever touched under the generator's lock.
#[derive(Debug)]
struct GeneratorState {
    last_timestamp: i64,
    sequence: i64,
    node_id: Option<i64>,
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// Every call runs entirely inside one critical section: reading the clock,
/// comparing against the last timestamp, advancing or resetting the
/// sequence, waiting out an exhausted millisecond, and resolving the node ID
/// on first use. Nothing finer-grained is locked, so the overflow check and
/// the timestamp/sequence update can never interleave between threads.
///
/// Share one instance per process (e.g. behind an [`Arc`]) so that all IDs
/// issued for the same node come from the same state.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Refuses to issue IDs when the clock moves backwards
/// - ✅ Blocks (spins) for at most one millisecond when 4096 IDs were already
///   issued in the current one
///
/// [`Arc`]: std::sync::Arc
pub struct LockSnowflakeGenerator<T, N = LocalIpNodeId>
where
    T: TimeSource,
    N: NodeIdResolver,
{
    state: Mutex<GeneratorState>,
    time: T,
    node: N,
}

impl<T> LockSnowflakeGenerator<T, LocalIpNodeId>
where
    T: TimeSource,
{
    /// Creates a generator whose node ID is derived from the local IPv4
    /// address on the first call.
    ///
    /// # Example
    /// ```
    /// use shardflake::{LockSnowflakeGenerator, SnowflakeGenerator, SystemClock};
    ///
    /// let generator = LockSnowflakeGenerator::new(SystemClock::default());
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert!(a < b);
    /// ```
    pub fn new(time: T) -> Self {
        Self::with_node(LocalIpNodeId, time)
    }
}

impl<T, N> LockSnowflakeGenerator<T, N>
where
    T: TimeSource,
    N: NodeIdResolver,
{
    /// Creates a generator with an explicit node ID resolver.
    ///
    /// # Parameters
    ///
    /// - `node`: resolves the node ID once, on the first generated ID.
    /// - `time`: a [`TimeSource`] (e.g. [`SystemClock`]) reporting
    ///   milliseconds since the epoch IDs are measured from.
    ///
    /// [`SystemClock`]: crate::SystemClock
    pub fn with_node(node: N, time: T) -> Self {
        Self::from_components(-1, 0, node, time)
    }

    /// Creates a generator preloaded with a last-issued timestamp and
    /// sequence.
    ///
    /// This is useful to restore a persisted high-water mark after a restart
    /// so that a clock which restarted behind it is detected as a regression
    /// instead of reissuing old IDs.
    pub fn from_components(last_timestamp: i64, sequence: i64, node: N, time: T) -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                last_timestamp,
                sequence: sequence & SnowflakeId::SEQUENCE_MASK,
                node_id: None,
            }),
            time,
            node,
        }
    }

    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reports a time earlier than
    ///   the last issued timestamp. A reading before the epoch is reported
    ///   the same way.
    /// - [`Error::InvalidNodeId`] if the node resolver returns a value
    ///   outside `0..=31`. The resolver is asked again on the next call.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding
    ///   the lock (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<SnowflakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let now = self.time.current_millis();
        let (timestamp, sequence) = match now.cmp(&state.last_timestamp) {
            Ordering::Less => return Err(Self::cold_clock_behind(state.last_timestamp, now)),
            Ordering::Equal => {
                let sequence = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
                if sequence == 0 {
                    (self.cold_wait_next_millis(state.last_timestamp), 0)
                } else {
                    (now, sequence)
                }
            }
            Ordering::Greater => (now, 0),
        };

        let node_id = match state.node_id {
            Some(node_id) => node_id,
            None => {
                let node_id = self.node.resolve();
                if !(0..=SnowflakeId::MAX_NODE_ID).contains(&node_id) {
                    return Err(Self::cold_invalid_node(node_id));
                }
                *state.node_id.insert(node_id)
            }
        };
        state.last_timestamp = timestamp;
        state.sequence = sequence;

        Ok(SnowflakeId::from_components(timestamp, node_id, sequence))
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: i64, now: i64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(last, now, "clock moved backwards; refusing to generate id");
        Error::ClockRegression { last, now }
    }

    #[cold]
    #[inline(never)]
    fn cold_invalid_node(node_id: i64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(node_id, "resolved node id does not fit the node field");
        Error::InvalidNodeId { node_id }
    }

    /// Spins until the clock moves past `last`.
    #[cold]
    #[inline(never)]
    fn cold_wait_next_millis(&self, last: i64) -> i64 {
        loop {
            let now = self.time.current_millis();
            if now > last {
                return now;
            }
            core::hint::spin_loop();
        }
    }
}

impl<T, N> SnowflakeGenerator for LockSnowflakeGenerator<T, N>
where
    T: TimeSource,
    N: NodeIdResolver,
{
    fn next_id(&self) -> Result<SnowflakeId> {
        self.try_next_id()
    }
}
