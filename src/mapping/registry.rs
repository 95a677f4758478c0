//! Mapping registry with a per-type metadata cache.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::CqlResult;
use crate::mapping::{
    DefaultDefinition, Entity, Map, MappingConfig, PocoData, PocoDataFactory, TypeDefinition,
};

/// Registered mapping definitions and the [`PocoData`] built from them.
///
/// Definitions are keyed by entity type name, so entries loaded from a mapping
/// file apply as soon as the matching type is requested. Entity types with no
/// definition map by convention.
#[derive(Default)]
pub struct MappingConfiguration {
    definitions: DashMap<String, Arc<dyn TypeDefinition>>,
    cache: DashMap<TypeId, Arc<PocoData>>,
}

impl MappingConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fluent mapping, replacing any earlier one for `T`.
    pub fn define<T: Entity>(&self, map: Map<T>) -> &Self {
        self.definitions
            .insert(T::type_name().to_string(), Arc::new(map));
        self.cache.remove(&TypeId::of::<T>());
        self
    }

    /// Register every table of a mapping file.
    pub fn load(&self, config: MappingConfig) -> &Self {
        for table in config.tables {
            let entity = table.entity.clone();
            self.definitions.insert(entity.clone(), Arc::new(table));
            self.cache.retain(|_, data| data.type_name != entity);
        }
        self
    }

    /// Metadata for `T`, built on first use.
    ///
    /// The build runs under the cache entry's lock, so a concurrent `define`
    /// either sees the built value and evicts it or is seen by the build.
    pub fn poco_data<T: Entity>(&self) -> CqlResult<Arc<PocoData>> {
        let type_id = TypeId::of::<T>();
        if let Some(data) = self.cache.get(&type_id) {
            return Ok(data.value().clone());
        }

        match self.cache.entry(type_id) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let definition = self
                    .definitions
                    .get(T::type_name())
                    .map(|d| d.value().clone())
                    .unwrap_or_else(|| Arc::new(DefaultDefinition) as Arc<dyn TypeDefinition>);
                let data = Arc::new(PocoDataFactory::build::<T>(definition.as_ref())?);
                tracing::debug!("Cached mapping for {}", T::type_name());
                Ok(entry.insert(data).value().clone())
            }
        }
    }

    pub fn is_defined(&self, entity: &str) -> bool {
        self.definitions.contains_key(entity)
    }
}

impl std::fmt::Debug for MappingConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingConfiguration")
            .field("definitions", &self.definitions.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}
