//! Content packs: items, roles, named pops and spawn settings in one YAML
//! document.

use crate::config::SpawnConfig;
use crate::error::PopError;
use crate::factory::EntityFactory;
use crate::registry::PopRegistry;
use delve_common::Overrides;
use delve_kernel::{Placement, Sprite};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Default properties for one item or role.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpriteTemplate {
    pub placement: Placement,
    pub overrides: Overrides,
}

/// The data-driven [`EntityFactory`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: BTreeMap<String, SpriteTemplate>,
    pub roles: BTreeMap<String, SpriteTemplate>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, name: impl Into<String>, placement: Placement) -> Self {
        self.items.insert(
            name.into(),
            SpriteTemplate {
                placement,
                overrides: Overrides::new(),
            },
        );
        self
    }

    pub fn with_role(mut self, name: impl Into<String>, placement: Placement) -> Self {
        self.roles.insert(
            name.into(),
            SpriteTemplate {
                placement,
                overrides: Overrides::new(),
            },
        );
        self
    }
}

impl EntityFactory for Catalog {
    fn create_item(&self, name: &str, overrides: &Overrides) -> Result<Sprite, PopError> {
        let t = self
            .items
            .get(name)
            .ok_or_else(|| PopError::UnknownItem(name.to_owned()))?;
        Ok(Sprite::item(name, t.placement)
            .with_overrides(&t.overrides)
            .with_overrides(overrides))
    }

    fn create_actor(&self, role: &str, overrides: &Overrides) -> Result<Sprite, PopError> {
        let t = self
            .roles
            .get(role)
            .ok_or_else(|| PopError::UnknownRole(role.to_owned()))?;
        Ok(Sprite::actor(role, t.placement)
            .with_overrides(&t.overrides)
            .with_overrides(overrides))
    }
}

/// A loaded content pack.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub config: SpawnConfig,
    pub catalog: Catalog,
    pub registry: PopRegistry,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContent {
    #[serde(default)]
    config: SpawnConfig,
    #[serde(default)]
    items: BTreeMap<String, SpriteTemplate>,
    #[serde(default)]
    roles: BTreeMap<String, SpriteTemplate>,
    #[serde(default)]
    pops: PopRegistry,
}

impl Content {
    /// Parse a content pack and check that every pop reference resolves.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PopError> {
        let raw: RawContent = serde_yaml::from_str(yaml)?;
        raw.pops.check_refs()?;
        Ok(Self {
            config: raw.config,
            catalog: Catalog {
                items: raw.items,
                roles: raw.roles,
            },
            registry: raw.pops,
        })
    }
}

/// Read and parse a content pack from disk.
pub fn load_content(path: impl AsRef<Path>) -> Result<Content, PopError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let content = Content::from_yaml_str(&text)?;
    tracing::debug!(
        path = %path.display(),
        items = content.catalog.items.len(),
        roles = content.catalog.roles.len(),
        pops = content.registry.len(),
        "loaded content"
    );
    Ok(content)
}
