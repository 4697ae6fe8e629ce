use shakmaty::Role;
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

/// A 64-bit position hash.
pub type Zobrist = u64;

/// The contract the search requires from a rules engine.
///
/// Implementors own a single mutable position that is advanced with
/// [`Rules::push`] and restored with [`Rules::pop`], which must be exact
/// inverses of each other.
pub trait Rules {
    /// The move representation.
    type Move: Clone + Eq + Debug;

    /// Plays a legal move.
    fn push(&mut self, m: Self::Move);

    /// Takes back the last move played.
    fn pop(&mut self);

    /// The legal moves in a stable enumeration order.
    fn moves(&self) -> Vec<Self::Move>;

    /// Whether the side to move is checkmated.
    fn is_checkmate(&self) -> bool;

    /// Whether the side to move has no legal moves but is not in check.
    fn is_stalemate(&self) -> bool;

    /// Whether neither side can possibly deliver mate.
    fn is_insufficient_material(&self) -> bool;

    /// Whether a move captures a piece.
    fn is_capture(&self, m: &Self::Move) -> bool;

    /// Whether a move checks the opponent.
    fn gives_check(&self, m: &Self::Move) -> bool;

    /// The [`Role`] of the piece being moved.
    fn mover(&self, m: &Self::Move) -> Role;

    /// The [`Role`] of the piece being captured, if any.
    fn captured(&self, m: &Self::Move) -> Option<Role>;

    /// The [`Role`] a pawn is promoted to, if any.
    fn promotion(&self, m: &Self::Move) -> Option<Role>;

    /// How many ranks past its starting rank a pawn lands, if the move is a pawn push.
    fn advance(&self, m: &Self::Move) -> Option<u8>;

    /// The material balance in centipawns from the point of view of the side to move.
    fn material(&self) -> i32;

    /// The position hash.
    fn zobrist(&self) -> Zobrist;

    /// Plays a move and returns a guard that takes it back when dropped.
    #[inline(always)]
    fn play(&mut self, m: Self::Move) -> Played<'_, Self>
    where
        Self: Sized,
    {
        self.push(m);
        Played(self)
    }
}

/// A [`Rules`] position with a move temporarily applied.
///
/// The move is taken back when the guard goes out of scope, on every exit path.
#[derive(Debug)]
pub struct Played<'a, R: Rules>(&'a mut R);

impl<R: Rules> Deref for Played<'_, R> {
    type Target = R;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<R: Rules> DerefMut for Played<'_, R> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0
    }
}

impl<R: Rules> Drop for Played<'_, R> {
    #[inline(always)]
    fn drop(&mut self) {
        self.0.pop();
    }
}
