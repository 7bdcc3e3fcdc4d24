//! Developer Tooling: world inspector and spawn reports.
//!
//! # Invariants
//! - Tools only read world state; they never mutate it.

mod inspector;
mod report;

pub use inspector::{SpriteInfo, TerrainCounts, WorldInspector, WorldSummary};
pub use report::SpawnReport;

pub fn crate_info() -> &'static str {
    "delve-tools v0.1.0"
}
