use serde::Deserialize;

/// Spawn configuration: seeding and search limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnConfig {
    /// Seed for the shared random source.
    pub seed: u64,
    /// Candidates examined in an unbounded region before giving up.
    pub unbounded_cap: usize,
    /// Randomize regions handed to the public entry points before placing.
    pub randomize_regions: bool,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            unbounded_cap: 4096,
            randomize_regions: true,
        }
    }
}
