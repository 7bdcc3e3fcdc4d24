//! Population: the pop-definition grammar and the spawn engine.
//!
//! # Invariants
//! - Within one spawn-tree evaluation the reserved set only grows and no
//!   coordinate receives two sprites.
//! - Placement-search failures skip a repetition with a warning; they never
//!   abort the spawn.
//! - Content errors and unbounded-set misuse are returned as [`PopError`].

mod config;
mod content;
mod error;
mod factory;
mod generate;
mod grammar;
mod record;
mod registry;
mod spawn;

pub use config::SpawnConfig;
pub use content::{Catalog, Content, SpriteTemplate, load_content};
pub use error::PopError;
pub use factory::EntityFactory;
pub use generate::{GeneratePops, generate_pops};
pub use grammar::{Alternative, Chance, Count, PopDef, PopKind, PopRequest};
pub use record::{SpawnChildren, SpawnRecord, SpawnStats};
pub use registry::PopRegistry;
pub use spawn::{SpawnContext, SpawnOutcome, Spawner};

pub fn crate_info() -> &'static str {
    "delve-populate v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("populate"));
    }
}
