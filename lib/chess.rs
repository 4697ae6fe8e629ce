mod material;
mod notation;
mod position;

pub use material::*;
pub use notation::*;
pub use position::*;

pub use shakmaty::{Color, File, Move, Piece, Rank, Role, Square};
