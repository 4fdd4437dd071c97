use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    entity::{Entity, FieldValue, KeyFieldCache, find_field},
    error::{Error, Result},
    id::SnowflakeId,
    partition::{PartitionStrategy, PartitioningConfig, quantity_bucket, time_table_name},
    time::DEFAULT_EPOCH,
};

/// Maps entities to the physical tables they live in.
///
/// A partitioner is cheap to share: its only state is the epoch used to
/// decode ID timestamps and a cache of each entity type's key field.
///
/// # Example
///
/// ```
/// use shardflake::{Entity, FieldDef, PartitioningConfig, SnowflakeId, TablePartitioner, TimeUnit};
///
/// struct Order {
///     id: i64,
/// }
///
/// fn order_id(order: &Order) -> i64 {
///     order.id
/// }
/// fn set_order_id(order: &mut Order, id: i64) {
///     order.id = id;
/// }
///
/// impl Entity for Order {
///     fn table_name() -> &'static str {
///         "Orders"
///     }
///     fn fields() -> &'static [FieldDef<Self>] {
///         const FIELDS: &[FieldDef<Order>] = &[FieldDef::generated_key("id", order_id, set_order_id)];
///         FIELDS
///     }
///     fn partitioning() -> PartitioningConfig {
///         PartitioningConfig::time_based(TimeUnit::Monthly)
///     }
/// }
///
/// // Generated at 2024-03-15T10:00:00Z.
/// let order = Order {
///     id: SnowflakeId::from_components(1_710_496_800_000, 1, 0).to_raw(),
/// };
/// let partitioner = TablePartitioner::new();
/// assert_eq!(partitioner.table_name_for(&order).unwrap(), "Orders_202403");
/// ```
#[derive(Debug)]
pub struct TablePartitioner {
    epoch: Duration,
    keys: KeyFieldCache,
}

impl Default for TablePartitioner {
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl TablePartitioner {
    /// A partitioner for IDs generated against [`DEFAULT_EPOCH`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A partitioner for IDs generated against `epoch`. It must match the
    /// epoch of the clock the generator was built with.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch,
            keys: KeyFieldCache::new(),
        }
    }

    /// Epoch used to decode ID timestamps, as an offset from the Unix epoch.
    pub fn epoch(&self) -> Duration {
        self.epoch
    }

    /// Table name for `entity` under its type's declared partitioning.
    ///
    /// # Errors
    ///
    /// See [`TablePartitioner::table_name_with`].
    pub fn table_name_for<E: Entity>(&self, entity: &E) -> Result<String> {
        self.table_name_with(entity, &E::partitioning())
    }

    /// Table name for `entity` under an explicit `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedStrategy`] if partitioning is enabled without a
    ///   strategy.
    /// - [`Error::NoPartitionKey`] if the strategy needs a key and none can
    ///   be read: no key field is declared, the named `key_field` does not
    ///   exist, or a time-based key is not an integer ID.
    /// - [`Error::InvalidTableCount`] for a quantity-based config with zero
    ///   tables.
    /// - [`Error::InvalidTableNameFormat`] for a malformed
    ///   `table_name_format`.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(entity = E::table_name())))]
    pub fn table_name_with<E: Entity>(&self, entity: &E, config: &PartitioningConfig) -> Result<String> {
        if !config.enabled {
            return Ok(E::table_name().to_owned());
        }
        let field = match config.key_field.as_deref() {
            Some(name) => find_field::<E>(name),
            None => self.keys.key_field::<E>(),
        };
        self.resolve(E::table_name(), field.map(|field| field.value(entity)), config)
    }

    /// Table name for a row of `base` whose partition key is `key`.
    ///
    /// This is the metadata-free form of
    /// [`TablePartitioner::table_name_with`], for callers that already hold
    /// the key value.
    ///
    /// # Errors
    ///
    /// Same as [`TablePartitioner::table_name_with`].
    pub fn resolve(
        &self,
        base: &str,
        key: Option<FieldValue<'_>>,
        config: &PartitioningConfig,
    ) -> Result<String> {
        if !config.enabled {
            return Ok(base.to_owned());
        }
        match config.strategy {
            PartitionStrategy::None => Err(Error::UnsupportedStrategy {
                entity: base.to_owned(),
            }),
            PartitionStrategy::TimeBased => {
                let Some(FieldValue::Int(id)) = key else {
                    return Err(no_key(base));
                };
                let created_at = SnowflakeId::from_raw(id).decode_timestamp_with_epoch(self.epoch);
                time_table_name(
                    base,
                    created_at,
                    config.time_unit,
                    config.table_name_format.as_deref(),
                )
            }
            PartitionStrategy::QuantityBased => {
                if config.table_count == 0 {
                    return Err(Error::InvalidTableCount {
                        entity: base.to_owned(),
                    });
                }
                let key = key.ok_or_else(|| no_key(base))?;
                let bucket = quantity_bucket(key, config.table_count).ok_or_else(|| {
                    Error::InvalidTableCount {
                        entity: base.to_owned(),
                    }
                })?;
                Ok(format!("{base}_{bucket}"))
            }
        }
    }
}

#[cold]
fn no_key(base: &str) -> Error {
    #[cfg(feature = "tracing")]
    tracing::error!(table = base, "no usable partition key");
    Error::NoPartitionKey {
        entity: base.to_owned(),
    }
}
