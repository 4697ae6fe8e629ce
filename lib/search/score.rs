use crate::eval::Value;
use crate::search::{MAX_PLY, Ply};
use derive_more::with_trait::Display;
use std::ops::Neg;

/// Number of [plies][`Ply`] to mate.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mate {
    #[default]
    None,
    Mating(Ply),
    Mated(Ply),
}

impl Mate {
    #[inline(always)]
    pub fn plies(&self) -> Option<Ply> {
        match *self {
            Mate::None => None,
            Mate::Mating(ply) => Some(ply),
            Mate::Mated(ply) => Some(ply),
        }
    }
}

/// The minimax score.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display("{_0}")]
pub struct Score(#[cfg_attr(test, strategy(-Score::MATE..=Score::MATE))] i32);

impl Score {
    /// The score of a side that is checkmated at the root.
    pub const MATE: i32 = 32000;

    /// The largest score that is not a mate score.
    pub const MAX_VALUE: i32 = Self::MATE - MAX_PLY as i32 - 1;

    /// The drawn score.
    pub const DRAW: Self = Score(0);

    /// Constructs a [`Score`] saturated to the valid range.
    #[inline(always)]
    pub const fn new(score: i32) -> Self {
        if score > Self::MATE {
            Score(Self::MATE)
        } else if score < -Self::MATE {
            Score(-Self::MATE)
        } else {
            Score(score)
        }
    }

    /// The raw score.
    #[inline(always)]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// The lowest possible score.
    #[inline(always)]
    pub const fn lower() -> Self {
        Score(-Self::MATE)
    }

    /// The highest possible score.
    #[inline(always)]
    pub const fn upper() -> Self {
        Score(Self::MATE)
    }

    /// Returns number of plies to mate, if one is in the horizon.
    #[inline(always)]
    pub fn mate(&self) -> Mate {
        if self.0 < -Self::MAX_VALUE {
            Mate::Mated((self.0 + Self::MATE) as Ply)
        } else if self.0 > Self::MAX_VALUE {
            Mate::Mating((Self::MATE - self.0) as Ply)
        } else {
            Mate::None
        }
    }

    /// Whether this is a mate score.
    #[inline(always)]
    pub fn is_mate(&self) -> bool {
        self.mate() != Mate::None
    }

    /// Normalizes mate scores from `ply` relative to the root node.
    #[inline(always)]
    pub fn relative_to_root(&self, ply: Ply) -> Self {
        if self.0 < -Self::MAX_VALUE {
            Score::new(self.0 - ply as i32)
        } else if self.0 > Self::MAX_VALUE {
            Score::new(self.0 + ply as i32)
        } else {
            *self
        }
    }

    /// Normalizes mate scores from the root node relative to `ply`.
    #[inline(always)]
    pub fn relative_to_ply(&self, ply: Ply) -> Self {
        if self.0 < -Self::MAX_VALUE {
            Score((self.0 + ply as i32).min(-Self::MAX_VALUE - 1))
        } else if self.0 > Self::MAX_VALUE {
            Score((self.0 - ply as i32).max(Self::MAX_VALUE + 1))
        } else {
            *self
        }
    }

    /// Mating score at `ply`
    #[inline(always)]
    pub fn mating(ply: Ply) -> Self {
        Self::upper().relative_to_ply(ply)
    }

    /// Mated score at `ply`
    #[inline(always)]
    pub fn mated(ply: Ply) -> Self {
        Self::lower().relative_to_ply(ply)
    }
}

impl From<Value> for Score {
    #[inline(always)]
    fn from(value: Value) -> Self {
        Score(value.clamp(-Self::MAX_VALUE, Self::MAX_VALUE))
    }
}

impl Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Score(-self.0)
    }
}
