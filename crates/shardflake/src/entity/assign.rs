#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    entity::{Entity, FieldAccessor},
    error::Result,
    generator::SnowflakeGenerator,
};

/// Populates the generator-assigned primary keys of a newly created entity.
///
/// Every field declared with [`FieldDef::generated_key`] whose current value
/// is `0` receives a fresh ID. Fields that already hold a non-zero value are
/// left untouched, so calling this again after a retried write is safe.
///
/// Returns the number of IDs assigned.
///
/// # Errors
///
/// Propagates the first generator error (e.g. a clock regression). Fields
/// assigned before the error keep their new values.
///
/// [`FieldDef::generated_key`]: crate::FieldDef::generated_key
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(entity = E::table_name())))]
pub fn assign_ids<E, G>(generator: &G, entity: &mut E) -> Result<usize>
where
    E: Entity,
    G: SnowflakeGenerator + ?Sized,
{
    let mut assigned = 0;
    for field in E::fields() {
        if !field.flags().generated_primary_key {
            continue;
        }
        if let FieldAccessor::Id { get, set } = field.accessor() {
            if get(entity) == 0 {
                set(entity, generator.next_id()?.to_raw());
                assigned += 1;
            }
        }
    }
    Ok(assigned)
}

/// Runs [`assign_ids`] over every entity marked for insertion.
///
/// # Errors
///
/// Stops at the first generator error.
pub fn assign_ids_all<'a, E, G, I>(generator: &G, entities: I) -> Result<usize>
where
    E: Entity,
    G: SnowflakeGenerator + ?Sized,
    I: IntoIterator<Item = &'a mut E>,
{
    entities
        .into_iter()
        .try_fold(0, |total, entity| Ok(total + assign_ids(generator, entity)?))
}
