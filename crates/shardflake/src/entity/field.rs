use core::fmt;

use crate::partition::PartitioningConfig;

/// Static metadata for a persisted entity type.
///
/// This replaces runtime field discovery: each type registers its fields once
/// as a `'static` table of accessors, and lookups (key fields, ID
/// assignment) walk that table instead of introspecting instances.
///
/// # Example
///
/// ```
/// use shardflake::{Entity, FieldDef, PartitioningConfig, TimeUnit};
///
/// struct Order {
///     id: i64,
///     customer: String,
/// }
///
/// fn order_id(order: &Order) -> i64 {
///     order.id
/// }
/// fn set_order_id(order: &mut Order, id: i64) {
///     order.id = id;
/// }
/// fn order_customer(order: &Order) -> &str {
///     &order.customer
/// }
///
/// impl Entity for Order {
///     fn table_name() -> &'static str {
///         "Orders"
///     }
///
///     fn fields() -> &'static [FieldDef<Self>] {
///         const FIELDS: &[FieldDef<Order>] = &[
///             FieldDef::generated_key("id", order_id, set_order_id),
///             FieldDef::text("customer", order_customer),
///         ];
///         FIELDS
///     }
///
///     fn partitioning() -> PartitioningConfig {
///         PartitioningConfig::time_based(TimeUnit::Monthly)
///     }
/// }
///
/// assert_eq!(Order::fields().len(), 2);
/// ```
pub trait Entity: Sized + 'static {
    /// The logical (unpartitioned) table name.
    fn table_name() -> &'static str;

    /// The registered fields, in declaration order.
    fn fields() -> &'static [FieldDef<Self>];

    /// How this type is split across physical tables. Not partitioned by
    /// default.
    fn partitioning() -> PartitioningConfig {
        PartitioningConfig::disabled()
    }
}

/// A field value as seen by partitioning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldValue<'a> {
    /// A 64-bit integer column, including generated IDs.
    Int(i64),
    /// A text column.
    Text(&'a str),
}

/// How a registered field is read (and, for generated IDs, written).
pub enum FieldAccessor<E> {
    /// A 64-bit integer ID column the generator can populate.
    Id {
        /// Reads the current value; `0` means unassigned.
        get: fn(&E) -> i64,
        /// Stores a generated value.
        set: fn(&mut E, i64),
    },
    /// A read-only 64-bit integer column.
    Int(fn(&E) -> i64),
    /// A read-only text column.
    Text(fn(&E) -> &str),
}

impl<E> Clone for FieldAccessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FieldAccessor<E> {}

/// Declared roles of a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldFlags {
    /// The field holds generator-typed IDs. Such a field is preferred
    /// over a plain primary key as the partition key.
    pub generated: bool,
    /// The field is the generator-assigned primary key. Only these fields
    /// are populated by [`assign_ids`](crate::assign_ids).
    pub generated_primary_key: bool,
    /// The field is the entity's primary key.
    pub primary_key: bool,
}

/// One entry of an entity's field table.
pub struct FieldDef<E> {
    name: &'static str,
    accessor: FieldAccessor<E>,
    flags: FieldFlags,
}

impl<E> Clone for FieldDef<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FieldDef<E> {}

impl<E> FieldDef<E> {
    /// A generator-assigned primary key.
    pub const fn generated_key(name: &'static str, get: fn(&E) -> i64, set: fn(&mut E, i64)) -> Self {
        Self::new(
            name,
            FieldAccessor::Id { get, set },
            FieldFlags {
                generated: true,
                generated_primary_key: true,
                primary_key: true,
            },
        )
    }

    /// A generator-typed ID column that is not the primary key.
    ///
    /// Such fields are never populated automatically, but one is used as
    /// the partition key when no generated primary key is declared.
    pub const fn generated(name: &'static str, get: fn(&E) -> i64, set: fn(&mut E, i64)) -> Self {
        Self::new(
            name,
            FieldAccessor::Id { get, set },
            FieldFlags {
                generated: true,
                generated_primary_key: false,
                primary_key: false,
            },
        )
    }

    /// A plain primary key, not assigned by the generator.
    pub const fn primary_key(name: &'static str, accessor: FieldAccessor<E>) -> Self {
        Self::new(
            name,
            accessor,
            FieldFlags {
                generated: false,
                generated_primary_key: false,
                primary_key: true,
            },
        )
    }

    /// A read-only integer column.
    pub const fn int(name: &'static str, get: fn(&E) -> i64) -> Self {
        Self::new(name, FieldAccessor::Int(get), FieldFlags::NONE)
    }

    /// A read-only text column.
    pub const fn text(name: &'static str, get: fn(&E) -> &str) -> Self {
        Self::new(name, FieldAccessor::Text(get), FieldFlags::NONE)
    }

    /// A field with explicit flags.
    pub const fn new(name: &'static str, accessor: FieldAccessor<E>, flags: FieldFlags) -> Self {
        Self {
            name,
            accessor,
            flags,
        }
    }

    /// Column name, as matched by `key_field` in [`PartitioningConfig`](crate::PartitioningConfig).
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared roles of the field.
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// How the field is read and written.
    pub const fn accessor(&self) -> FieldAccessor<E> {
        self.accessor
    }

    /// Reads the field from `entity`.
    pub fn value<'a>(&self, entity: &'a E) -> FieldValue<'a> {
        match self.accessor {
            FieldAccessor::Id { get, .. } | FieldAccessor::Int(get) => FieldValue::Int(get(entity)),
            FieldAccessor::Text(get) => FieldValue::Text(get(entity)),
        }
    }
}

impl FieldFlags {
    const NONE: Self = Self {
        generated: false,
        generated_primary_key: false,
        primary_key: false,
    };
}

impl<E> fmt::Debug for FieldDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.accessor {
            FieldAccessor::Id { .. } => "id",
            FieldAccessor::Int(_) => "int",
            FieldAccessor::Text(_) => "text",
        };
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("flags", &self.flags)
            .finish()
    }
}
