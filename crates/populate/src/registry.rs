use crate::error::PopError;
use crate::grammar::PopDef;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Flat table of named, reusable pop definitions.
///
/// References are resolved by name at use time, so definitions may refer to
/// each other in any order, including recursively. Recursion depth is the
/// content author's responsibility.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PopRegistry {
    pops: BTreeMap<String, PopDef>,
}

impl PopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def` under `name`, returning any definition it replaces.
    pub fn insert(&mut self, name: impl Into<String>, def: PopDef) -> Option<PopDef> {
        self.pops.insert(name.into(), def)
    }

    pub fn get(&self, name: &str) -> Option<&PopDef> {
        self.pops.get(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&PopDef, PopError> {
        self.get(name).ok_or_else(|| PopError::UnknownPop(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pops.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pops.is_empty()
    }

    /// Validate every definition and check that every reference names a
    /// registered pop.
    pub fn check_refs(&self) -> Result<(), PopError> {
        for def in self.pops.values() {
            def.validate()?;
            for name in def.refs() {
                self.resolve(name)?;
            }
        }
        Ok(())
    }
}
