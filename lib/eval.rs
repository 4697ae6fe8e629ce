mod classical;

pub use classical::*;

/// A static evaluation in centipawns.
pub type Value = i32;

/// The static evaluator contract.
///
/// Scores are always from the point of view of the side to move, so that a
/// negamax search only ever needs to negate them.
pub trait Evaluator<P> {
    /// Scores a position.
    fn evaluate(&self, pos: &P) -> Value;
}

impl<P, F: Fn(&P) -> Value> Evaluator<P> for F {
    #[inline(always)]
    fn evaluate(&self, pos: &P) -> Value {
        self(pos)
    }
}
