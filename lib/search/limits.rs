use crate::search::{Depth, MAX_DEPTH};
use std::time::Duration;

/// Bounds on how far a search may go.
///
/// Every field left as `None` is unbounded, and whichever bound is hit
/// first ends the search.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Limits {
    /// Deepest iteration to complete, capped at [`MAX_DEPTH`].
    pub depth: Option<Depth>,

    /// Node budget across all iterations.
    pub nodes: Option<u64>,

    /// Wall-clock budget for the whole search.
    pub time: Option<Duration>,

    /// Time left on the side to move's clock and its increment.
    pub clock: Option<(Duration, Duration)>,
}

impl Limits {
    /// No bounds at all.
    #[inline(always)]
    pub fn none() -> Self {
        Self::default()
    }

    /// Bounded by depth alone.
    #[inline(always)]
    pub fn depth(depth: Depth) -> Self {
        Limits { depth: Some(depth), ..Self::none() }
    }

    /// Bounded by node count alone.
    #[inline(always)]
    pub fn nodes(nodes: u64) -> Self {
        Limits { nodes: Some(nodes), ..Self::none() }
    }

    /// Bounded by a fixed time budget alone.
    #[inline(always)]
    pub fn time(time: Duration) -> Self {
        Limits { time: Some(time), ..Self::none() }
    }

    /// Bounded by a running clock alone.
    #[inline(always)]
    pub fn clock(left: Duration, increment: Duration) -> Self {
        Limits { clock: Some((left, increment)), ..Self::none() }
    }

    /// The deepest iteration the search may start.
    #[inline(always)]
    pub fn max_depth(&self) -> Depth {
        self.depth.map_or(MAX_DEPTH, |d| d.min(MAX_DEPTH))
    }

    /// The number of nodes the search may visit.
    #[inline(always)]
    pub fn max_nodes(&self) -> u64 {
        self.nodes.unwrap_or(u64::MAX)
    }

    /// The time the search may spend.
    ///
    /// A running clock allots a thirtieth of the time left plus half the
    /// increment, but never more than half of what remains.
    #[inline(always)]
    pub fn max_time(&self) -> Duration {
        let allotted = self.clock.map_or(Duration::MAX, |(left, inc)| {
            let slice = (left / 30).saturating_add(inc / 2);
            slice.min(left / 2)
        });

        self.time.map_or(allotted, |t| t.min(allotted))
    }
}
