//! Region to material bindings

use crate::regions::Region;
use roomtint_core::{Error, Material, MaterialCatalog, RegionId, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Materials applied to regions, keyed by region id. Absence means unbound.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MaterialBindings {
    entries: BTreeMap<RegionId, Material>,
}

impl MaterialBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `material` to the currently selected region, replacing any
    /// previous binding. Returns the replaced material.
    ///
    /// Rejected without a selection, or when the material is not offered
    /// for the selected region's category; nothing changes on rejection.
    pub fn apply(
        &mut self,
        selected: Option<&Region>,
        material: &Material,
        catalog: &MaterialCatalog,
    ) -> Result<Option<Material>> {
        let region = selected.ok_or_else(|| {
            Error::InvalidSelection("no region is selected".to_string())
        })?;

        if !catalog.contains(region.category, material) {
            return Err(Error::InvalidSelection(format!(
                "material '{}' is not offered for {} regions",
                material.id, region.category
            )));
        }

        debug!("Binding material '{}' to region {}", material.id, region.id);
        Ok(self.entries.insert(region.id, material.clone()))
    }

    /// Remove the binding for `id`; a no-op if there is none
    pub fn clear(&mut self, id: RegionId) -> Option<Material> {
        let removed = self.entries.remove(&id);
        if removed.is_some() {
            debug!("Cleared binding of region {}", id);
        }
        removed
    }

    pub fn get(&self, id: RegionId) -> Option<&Material> {
        self.entries.get(&id)
    }

    pub fn is_bound(&self, id: RegionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Material)> {
        self.entries.iter().map(|(id, m)| (*id, m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
