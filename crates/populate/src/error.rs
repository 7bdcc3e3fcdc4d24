use delve_common::EntityId;
use delve_coords::CoordError;
use delve_kernel::WorldError;

/// Content-definition errors and wrapped collaborator failures.
///
/// Placement-search failures are not errors; they skip a repetition.
#[derive(Debug, thiserror::Error)]
pub enum PopError {
    #[error("pop definition has none of item, role, pop, pick_one, pick_each")]
    UnrecognizedTag,
    #[error("pop definition has more than one kind: {0:?}")]
    AmbiguousTag(Vec<&'static str>),
    #[error("unknown pop: {0}")]
    UnknownPop(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("{0}: size resolved to zero cells")]
    ZeroSize(String),
    #[error("invalid range [{lo}, {hi}]")]
    InvalidRange { lo: u32, hi: u32 },
    #[error("chance {0} is outside [0, 100]")]
    InvalidChance(f64),
    #[error("weight {0} must be finite and non-negative")]
    InvalidWeight(f64),
    #[error("pick_one needs at least one alternative with positive weight")]
    EmptyPickOne,
    #[error("anchor {0} is not standing in the world")]
    AnchorNotPlaced(EntityId),
    #[error(transparent)]
    Coord(#[from] CoordError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
