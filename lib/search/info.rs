use crate::chess::Move;
use crate::search::{Depth, MAX_DEPTH, Score};
use arrayvec::ArrayVec;
use derive_more::with_trait::Constructor;
use std::time::Duration;

/// A sequence of moves no longer than the deepest iteration.
pub type Line<M = Move> = ArrayVec<M, { MAX_DEPTH as usize }>;

/// Information about the search result.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Constructor)]
pub struct Info<M = Move> {
    depth: Depth,
    time: Duration,
    nodes: u64,
    score: Score,
    pv: Line<M>,
}

impl<M> Info<M> {
    /// The depth searched.
    #[inline(always)]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// The duration searched.
    #[inline(always)]
    pub fn time(&self) -> Duration {
        self.time
    }

    /// The number of nodes searched.
    #[inline(always)]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// The search score from the point of view of the side to move.
    #[inline(always)]
    pub fn score(&self) -> Score {
        self.score
    }

    /// The principal variation.
    #[inline(always)]
    pub fn pv(&self) -> &[M] {
        &self.pv
    }

    /// The best move.
    #[inline(always)]
    pub fn best(&self) -> Option<&M> {
        self.pv.first()
    }
}
