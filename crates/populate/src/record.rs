//! Diagnostic trees describing what a spawn placed.

use delve_common::EntityId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Child records of a node, grouped by repetition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnChildren {
    #[default]
    Empty,
    /// Exactly one repetition produced exactly one child.
    Single(Box<SpawnRecord>),
    Repetitions(Vec<Vec<SpawnRecord>>),
}

impl SpawnChildren {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// All child records, flattened across repetitions.
    pub fn records(&self) -> Vec<&SpawnRecord> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(r) => vec![r.as_ref()],
            Self::Repetitions(reps) => reps.iter().flatten().collect(),
        }
    }
}

/// One evaluated pop-definition node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnRecord {
    /// Label of the definition, e.g. `role:crab`.
    pub pop: String,
    /// Sprites placed by this node and everything beneath it.
    pub sprites: usize,
    /// Coordinates newly reserved by this node and everything beneath it.
    pub coords: usize,
    /// Sprites this node placed directly, as a leaf.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityId>,
    #[serde(skip_serializing_if = "SpawnChildren::is_empty")]
    pub children: SpawnChildren,
    #[serde(skip)]
    building: Vec<Vec<SpawnRecord>>,
}

/// Aggregate numbers over a record tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpawnStats {
    pub records: usize,
    pub sprites: usize,
    pub coords: usize,
    pub max_depth: usize,
    /// Directly placed sprites per leaf label.
    pub by_pop: BTreeMap<String, usize>,
}

impl SpawnRecord {
    pub fn new(pop: impl Into<String>) -> Self {
        Self {
            pop: pop.into(),
            sprites: 0,
            coords: 0,
            entities: Vec::new(),
            children: SpawnChildren::Empty,
            building: Vec::new(),
        }
    }

    pub(crate) fn start_repetition(&mut self) {
        self.building.push(Vec::new());
    }

    pub(crate) fn push_child(&mut self, child: SpawnRecord) {
        match self.building.last_mut() {
            Some(rep) => rep.push(child),
            None => self.building.push(vec![child]),
        }
    }

    /// Fold the collected repetitions into `children`.
    pub(crate) fn finish(&mut self) {
        let mut reps = std::mem::take(&mut self.building);
        self.children = if reps.iter().all(Vec::is_empty) {
            SpawnChildren::Empty
        } else if reps.len() == 1 && reps[0].len() == 1 {
            match reps.pop().and_then(|mut rep| rep.pop()) {
                Some(only) => SpawnChildren::Single(Box::new(only)),
                None => SpawnChildren::Empty,
            }
        } else {
            SpawnChildren::Repetitions(reps)
        };
    }

    /// Visit every record, depth first, with its depth (root = 0).
    pub fn visit(&self, f: &mut dyn FnMut(&SpawnRecord, usize)) {
        self.visit_at(0, f);
    }

    fn visit_at(&self, depth: usize, f: &mut dyn FnMut(&SpawnRecord, usize)) {
        f(self, depth);
        for child in self.children.records() {
            child.visit_at(depth + 1, f);
        }
    }

    pub fn stats(&self) -> SpawnStats {
        let mut stats = SpawnStats {
            sprites: self.sprites,
            coords: self.coords,
            ..SpawnStats::default()
        };
        self.visit(&mut |r, depth| {
            stats.records += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if !r.entities.is_empty() {
                *stats.by_pop.entry(r.pop.clone()).or_default() += r.entities.len();
            }
        });
        stats
    }
}
