use core::any::TypeId;
use std::collections::HashMap;

use crate::{
    entity::{Entity, FieldDef},
    generator::Mutex,
};

/// Finds the field that supplies an entity type's partition key.
///
/// Selection order:
/// 1. the field declared as the generator-assigned primary key;
/// 2. otherwise, the first generator-typed ID field;
/// 3. otherwise, the field declared as the generic primary key.
pub fn find_key_field<E: Entity>() -> Option<&'static FieldDef<E>> {
    let fields = E::fields();
    fields
        .iter()
        .find(|field| field.flags().generated_primary_key)
        .or_else(|| fields.iter().find(|field| field.flags().generated))
        .or_else(|| fields.iter().find(|field| field.flags().primary_key))
}

/// Finds a field by its registered name.
pub fn find_field<E: Entity>(name: &str) -> Option<&'static FieldDef<E>> {
    E::fields().iter().find(|field| field.name() == name)
}

/// Per-type cache of [`find_key_field`] results.
///
/// Field tables are static metadata, so the position of the key field is
/// resolved once per entity type and reused on every lookup.
#[derive(Debug, Default)]
pub struct KeyFieldCache {
    positions: Mutex<HashMap<TypeId, Option<usize>>>,
}

impl KeyFieldCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key field of `E`, resolving and caching it on first use.
    pub fn key_field<E: Entity>(&self) -> Option<&'static FieldDef<E>> {
        let fields = E::fields();
        let mut positions = self.lock();
        let position = *positions.entry(TypeId::of::<E>()).or_insert_with(|| {
            find_key_field::<E>().and_then(|key| {
                fields
                    .iter()
                    .position(|field| core::ptr::eq(field, key))
            })
        });
        position.and_then(|index| fields.get(index))
    }

    /// Number of entity types resolved so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no entity type has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> crate::generator::MutexGuard<'_, HashMap<TypeId, Option<usize>>> {
        #[cfg(feature = "parking-lot")]
        {
            self.positions.lock()
        }
        // Entries are inserted whole, so a poisoned map is still consistent.
        #[cfg(not(feature = "parking-lot"))]
        {
            self.positions
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }
}
