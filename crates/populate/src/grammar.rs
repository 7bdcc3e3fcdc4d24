//! The pop-definition grammar.
//!
//! A [`PopDef`] is an explicit sum type. Content files use the shape-keyed
//! form (`{ role: crab, count: [1, 3] }`); the kind is inferred from which
//! key is present while deserializing, and anything that is not exactly one
//! kind is rejected there.

use crate::error::PopError;
use delve_common::{Overrides, SpriteKind};
use delve_coords::RandomSource;
use serde::{Deserialize, Serialize};

/// A fixed number or an inclusive random range, resolved once per use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Fixed(u32),
    Range([u32; 2]),
}

impl Count {
    pub fn exactly(n: u32) -> Self {
        Self::Fixed(n)
    }

    pub fn between(lo: u32, hi: u32) -> Self {
        Self::Range([lo, hi])
    }

    pub fn validate(self) -> Result<(), PopError> {
        match self {
            Self::Range([lo, hi]) if lo > hi => Err(PopError::InvalidRange { lo, hi }),
            _ => Ok(()),
        }
    }

    pub fn resolve(self, rng: &RandomSource) -> Result<u32, PopError> {
        self.validate()?;
        Ok(match self {
            Self::Fixed(n) => n,
            Self::Range([lo, hi]) => rng.range_inclusive(lo as i64, hi as i64) as u32,
        })
    }

    /// Largest value this count can resolve to.
    pub fn max(self) -> u32 {
        match self {
            Self::Fixed(n) => n,
            Self::Range([_, hi]) => hi,
        }
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum ChanceSpec {
    One(f64),
    Many(Vec<f64>),
}

/// Odds, in percent, rolled independently on every repetition.
///
/// Each passing roll is one attempt, so `[100, 50]` means "once, and maybe
/// a second time".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChanceSpec", into = "ChanceSpec")]
pub struct Chance(Vec<f64>);

impl Chance {
    pub fn always() -> Self {
        Self(vec![100.0])
    }

    pub fn percent(odds: f64) -> Self {
        Self(vec![odds])
    }

    pub fn rolls(odds: impl Into<Vec<f64>>) -> Self {
        Self(odds.into())
    }

    pub fn odds(&self) -> &[f64] {
        &self.0
    }

    pub fn validate(&self) -> Result<(), PopError> {
        match self.0.iter().find(|p| !(0.0..=100.0).contains(*p)) {
            Some(&p) => Err(PopError::InvalidChance(p)),
            None => Ok(()),
        }
    }

    /// Roll every entry once and return how many passed.
    pub fn passes(&self, rng: &RandomSource) -> u32 {
        self.0.iter().filter(|&&p| rng.percent(p)).count() as u32
    }
}

impl Default for Chance {
    fn default() -> Self {
        Self::always()
    }
}

impl From<ChanceSpec> for Chance {
    fn from(spec: ChanceSpec) -> Self {
        match spec {
            ChanceSpec::One(p) => Self(vec![p]),
            ChanceSpec::Many(ps) => Self(ps),
        }
    }
}

impl From<Chance> for ChanceSpec {
    fn from(chance: Chance) -> Self {
        if chance.0.len() == 1 {
            Self::One(chance.0[0])
        } else {
            Self::Many(chance.0)
        }
    }
}

/// One weighted branch of a pick-one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub def: PopDef,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopKind {
    Item { name: String, overrides: Overrides },
    Role { name: String, overrides: Overrides },
    /// A named definition resolved against the registry when used.
    Ref(String),
    PickOne(Vec<Alternative>),
    PickEach(Vec<PopDef>),
}

/// A node of the content grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPopDef", into = "RawPopDef")]
pub struct PopDef {
    pub kind: PopKind,
    pub count: Count,
    pub chance: Chance,
    /// Target cell count of a contiguous footprint for this node.
    pub size: Option<Count>,
}

/// A leaf of a pop-definition tree: one sprite to create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopRequest {
    pub kind: SpriteKind,
    pub name: String,
    pub overrides: Overrides,
}

impl PopDef {
    pub fn new(kind: PopKind) -> Self {
        Self {
            kind,
            count: Count::default(),
            chance: Chance::default(),
            size: None,
        }
    }

    pub fn item(name: impl Into<String>) -> Self {
        Self::new(PopKind::Item {
            name: name.into(),
            overrides: Overrides::new(),
        })
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self::new(PopKind::Role {
            name: name.into(),
            overrides: Overrides::new(),
        })
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(PopKind::Ref(name.into()))
    }

    pub fn pick_one(alternatives: impl IntoIterator<Item = (PopDef, f64)>) -> Self {
        Self::new(PopKind::PickOne(
            alternatives
                .into_iter()
                .map(|(def, weight)| Alternative { def, weight })
                .collect(),
        ))
    }

    pub fn pick_each(children: impl IntoIterator<Item = PopDef>) -> Self {
        Self::new(PopKind::PickEach(children.into_iter().collect()))
    }

    pub fn with_count(mut self, count: Count) -> Self {
        self.count = count;
        self
    }

    pub fn with_chance(mut self, chance: Chance) -> Self {
        self.chance = chance;
        self
    }

    pub fn with_size(mut self, size: Count) -> Self {
        self.size = Some(size);
        self
    }

    /// Set overrides on a leaf. Other kinds are returned unchanged.
    pub fn with_overrides(mut self, new: Overrides) -> Self {
        if let PopKind::Item { overrides, .. } | PopKind::Role { overrides, .. } = &mut self.kind {
            *overrides = new;
        }
        self
    }

    /// Short human-readable name for logs and diagnostics.
    pub fn label(&self) -> String {
        match &self.kind {
            PopKind::Item { name, .. } => format!("item:{name}"),
            PopKind::Role { name, .. } => format!("role:{name}"),
            PopKind::Ref(name) => format!("pop:{name}"),
            PopKind::PickOne(alts) => format!("pick_one({})", alts.len()),
            PopKind::PickEach(children) => format!("pick_each({})", children.len()),
        }
    }

    /// The sprite request for an item or role leaf.
    pub fn request(&self) -> Option<PopRequest> {
        let (kind, name, overrides) = match &self.kind {
            PopKind::Item { name, overrides } => (SpriteKind::Item, name, overrides),
            PopKind::Role { name, overrides } => (SpriteKind::Actor, name, overrides),
            _ => return None,
        };
        Some(PopRequest {
            kind,
            name: name.clone(),
            overrides: overrides.clone(),
        })
    }

    fn check_node(&self) -> Result<(), PopError> {
        self.count.validate()?;
        self.chance.validate()?;
        if let Some(size) = self.size {
            size.validate()?;
            if size.max() == 0 {
                return Err(PopError::ZeroSize(self.label()));
            }
        }
        if let PopKind::PickOne(alts) = &self.kind {
            if let Some(a) = alts.iter().find(|a| !a.weight.is_finite() || a.weight < 0.0) {
                return Err(PopError::InvalidWeight(a.weight));
            }
            if !alts.iter().any(|a| a.weight > 0.0) {
                return Err(PopError::EmptyPickOne);
            }
        }
        Ok(())
    }

    /// Check this node and every node beneath it. Named references are not
    /// followed; see [`crate::PopRegistry::check_refs`].
    pub fn validate(&self) -> Result<(), PopError> {
        self.check_node()?;
        match &self.kind {
            PopKind::PickOne(alts) => alts.iter().try_for_each(|a| a.def.validate()),
            PopKind::PickEach(children) => children.iter().try_for_each(PopDef::validate),
            _ => Ok(()),
        }
    }

    /// Every named reference in this tree, in depth-first order.
    pub fn refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            PopKind::Ref(name) => out.push(name),
            PopKind::PickOne(alts) => alts.iter().for_each(|a| a.def.collect_refs(out)),
            PopKind::PickEach(children) => children.iter().for_each(|c| c.collect_refs(out)),
            PopKind::Item { .. } | PopKind::Role { .. } => {}
        }
    }
}

/// The shape-keyed form used in content files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPopDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pick_one: Option<Vec<RawPopDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pick_each: Option<Vec<RawPopDef>>,
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    overrides: Overrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<Count>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chance: Option<Chance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<Count>,
    /// Only meaningful on the alternatives of a `pick_one`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
}

impl TryFrom<RawPopDef> for PopDef {
    type Error = PopError;

    fn try_from(raw: RawPopDef) -> Result<Self, PopError> {
        let present = [
            ("item", raw.item.is_some()),
            ("role", raw.role.is_some()),
            ("pop", raw.pop.is_some()),
            ("pick_one", raw.pick_one.is_some()),
            ("pick_each", raw.pick_each.is_some()),
        ];
        let tags: Vec<&'static str> = present.iter().filter(|(_, p)| *p).map(|(t, _)| *t).collect();
        if tags.len() > 1 {
            return Err(PopError::AmbiguousTag(tags));
        }
        let kind = if let Some(name) = raw.item {
            PopKind::Item {
                name,
                overrides: raw.overrides,
            }
        } else if let Some(name) = raw.role {
            PopKind::Role {
                name,
                overrides: raw.overrides,
            }
        } else if let Some(name) = raw.pop {
            PopKind::Ref(name)
        } else if let Some(alts) = raw.pick_one {
            let alts = alts
                .into_iter()
                .map(|r| {
                    let weight = r.weight.unwrap_or(1.0);
                    Ok(Alternative {
                        def: PopDef::try_from(r)?,
                        weight,
                    })
                })
                .collect::<Result<_, PopError>>()?;
            PopKind::PickOne(alts)
        } else if let Some(children) = raw.pick_each {
            let children = children
                .into_iter()
                .map(PopDef::try_from)
                .collect::<Result<_, _>>()?;
            PopKind::PickEach(children)
        } else {
            return Err(PopError::UnrecognizedTag);
        };
        let def = PopDef {
            kind,
            count: raw.count.unwrap_or_default(),
            chance: raw.chance.unwrap_or_default(),
            size: raw.size,
        };
        def.check_node()?;
        Ok(def)
    }
}

impl From<PopDef> for RawPopDef {
    fn from(def: PopDef) -> Self {
        let mut raw = RawPopDef {
            count: (def.count != Count::default()).then_some(def.count),
            chance: (def.chance != Chance::default()).then_some(def.chance),
            size: def.size,
            ..RawPopDef::default()
        };
        match def.kind {
            PopKind::Item { name, overrides } => {
                raw.item = Some(name);
                raw.overrides = overrides;
            }
            PopKind::Role { name, overrides } => {
                raw.role = Some(name);
                raw.overrides = overrides;
            }
            PopKind::Ref(name) => raw.pop = Some(name),
            PopKind::PickOne(alts) => {
                raw.pick_one = Some(
                    alts.into_iter()
                        .map(|a| RawPopDef {
                            weight: Some(a.weight),
                            ..RawPopDef::from(a.def)
                        })
                        .collect(),
                );
            }
            PopKind::PickEach(children) => {
                raw.pick_each = Some(children.into_iter().map(RawPopDef::from).collect());
            }
        }
        raw
    }
}
