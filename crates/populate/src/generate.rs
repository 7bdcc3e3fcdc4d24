//! Lazy expansion of a pop definition into leaf requests.

use crate::error::PopError;
use crate::grammar::{PopDef, PopKind, PopRequest};
use crate::registry::PopRegistry;
use delve_coords::RandomSource;

enum Frame<'a> {
    /// A node with `reps` repetitions left and `pending` passing chance
    /// rolls left in the current repetition.
    Node {
        def: &'a PopDef,
        reps: u32,
        pending: u32,
    },
    /// The children of a pick-each, expanded in order.
    Children { defs: &'a [PopDef], next: usize },
}

enum Step<'a> {
    Yield(PopRequest),
    Push(&'a PopDef),
    PushChildren(&'a [PopDef]),
    Pop,
    Continue,
}

/// Iterator over the leaf requests of a pop definition.
///
/// `count` is resolved when a node is entered; on each repetition every
/// `chance` entry is rolled and each pass expands the node once. Pick-one
/// draws one weighted alternative per pass. Named references are resolved
/// against the registry when reached. An error ends the iteration.
pub struct GeneratePops<'a> {
    registry: &'a PopRegistry,
    rng: RandomSource,
    stack: Vec<Frame<'a>>,
    pending_root: Option<&'a PopDef>,
}

pub fn generate_pops<'a>(def: &'a PopDef, registry: &'a PopRegistry, rng: &RandomSource) -> GeneratePops<'a> {
    GeneratePops {
        registry,
        rng: rng.clone(),
        stack: Vec::new(),
        pending_root: Some(def),
    }
}

impl<'a> GeneratePops<'a> {
    fn enter(&mut self, def: &'a PopDef) -> Result<(), PopError> {
        let reps = def.count.resolve(&self.rng)?;
        self.stack.push(Frame::Node {
            def,
            reps,
            pending: 0,
        });
        Ok(())
    }

    fn step(&mut self) -> Result<Option<Step<'a>>, PopError> {
        let registry = self.registry;
        let Some(top) = self.stack.last_mut() else {
            return Ok(None);
        };
        let step = match top {
            Frame::Children { defs, next } => {
                let defs: &'a [PopDef] = *defs;
                match defs.get(*next) {
                    Some(child) => {
                        *next += 1;
                        Step::Push(child)
                    }
                    None => Step::Pop,
                }
            }
            Frame::Node { def, reps, pending } => {
                let def: &'a PopDef = *def;
                if *pending > 0 {
                    *pending -= 1;
                    match &def.kind {
                        PopKind::Item { .. } | PopKind::Role { .. } => match def.request() {
                            Some(req) => Step::Yield(req),
                            None => Step::Continue,
                        },
                        PopKind::Ref(name) => Step::Push(registry.resolve(name)?),
                        PopKind::PickOne(alts) => {
                            let weights: Vec<f64> = alts.iter().map(|a| a.weight).collect();
                            let i = self.rng.weighted(&weights).ok_or(PopError::EmptyPickOne)?;
                            Step::Push(&alts[i].def)
                        }
                        PopKind::PickEach(children) => Step::PushChildren(children),
                    }
                } else if *reps > 0 {
                    *reps -= 1;
                    *pending = def.chance.passes(&self.rng);
                    Step::Continue
                } else {
                    Step::Pop
                }
            }
        };
        Ok(Some(step))
    }
}

impl Iterator for GeneratePops<'_> {
    type Item = Result<PopRequest, PopError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.pending_root.take() {
            if let Err(e) = self.enter(root) {
                return Some(Err(e));
            }
        }
        loop {
            let step = match self.step() {
                Ok(Some(step)) => step,
                Ok(None) => return None,
                Err(e) => {
                    self.stack.clear();
                    return Some(Err(e));
                }
            };
            match step {
                Step::Yield(req) => return Some(Ok(req)),
                Step::Push(def) => {
                    if let Err(e) = self.enter(def) {
                        self.stack.clear();
                        return Some(Err(e));
                    }
                }
                Step::PushChildren(defs) => self.stack.push(Frame::Children { defs, next: 0 }),
                Step::Pop => {
                    self.stack.pop();
                }
                Step::Continue => {}
            }
        }
    }
}
