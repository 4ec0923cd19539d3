mod engine;
mod kind;
mod rest_block;

pub use engine::{BreakEngine, Status};
pub use kind::{BreakKind, BreakResult};
