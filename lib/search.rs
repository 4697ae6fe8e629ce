mod control;
mod engine;
mod info;
mod killers;
mod limits;
mod options;
mod ordering;
mod quiescence;
mod score;
mod transposition;

pub use control::*;
pub use engine::*;
pub use info::*;
pub use killers::*;
pub use limits::*;
pub use options::*;
pub use ordering::*;
pub use score::*;
pub use transposition::*;

/// The number of plies left to search.
pub type Depth = u8;

/// The number of plies from the root.
pub type Ply = u16;

/// The deepest iteration the engine will attempt.
pub const MAX_DEPTH: Depth = 100;

/// An upper bound on how far from the root any node can be.
pub const MAX_PLY: Ply = 256;

/// The material surplus in centipawns above which a side counts as clearly ahead.
pub const ADVANTAGE: i32 = 300;
