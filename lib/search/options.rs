use derive_more::with_trait::{Display, Error};
use std::num::ParseIntError;
use std::str::FromStr;

/// The reason why parsing an option value failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("expected a non-negative integer")]
pub struct ParseOptionError(#[error(not(source))] ParseIntError);

/// The size of the transposition table in MiB.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display("{_0}")]
pub struct HashSize(#[cfg_attr(test, strategy(0..=4usize))] usize);

impl HashSize {
    /// The largest table accepted.
    pub const MAX: usize = 1 << 16;

    /// Constructs a [`HashSize`] saturated to [`Self::MAX`].
    #[inline(always)]
    pub const fn new(mib: usize) -> Self {
        if mib > Self::MAX {
            HashSize(Self::MAX)
        } else {
            HashSize(mib)
        }
    }

    /// The size in MiB.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// The size in bytes.
    #[inline(always)]
    pub const fn bytes(&self) -> usize {
        self.0 << 20
    }
}

impl Default for HashSize {
    #[inline(always)]
    fn default() -> Self {
        HashSize(16)
    }
}

impl FromStr for HashSize {
    type Err = ParseOptionError;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(HashSize::new).map_err(ParseOptionError)
    }
}

/// How many plies the quiescence search may extend past the horizon.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display("{_0}")]
pub struct QuiescenceDepth(#[cfg_attr(test, strategy(0..=Self::MAX))] u8);

impl QuiescenceDepth {
    /// The deepest extension accepted.
    pub const MAX: u8 = 32;

    /// Constructs a [`QuiescenceDepth`] saturated to [`Self::MAX`].
    #[inline(always)]
    pub const fn new(plies: u8) -> Self {
        if plies > Self::MAX {
            QuiescenceDepth(Self::MAX)
        } else {
            QuiescenceDepth(plies)
        }
    }

    /// The number of plies.
    #[inline(always)]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl Default for QuiescenceDepth {
    #[inline(always)]
    fn default() -> Self {
        QuiescenceDepth(4)
    }
}

impl FromStr for QuiescenceDepth {
    type Err = ParseOptionError;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let plies: u32 = s.trim().parse().map_err(ParseOptionError)?;
        Ok(QuiescenceDepth::new(plies.min(Self::MAX as u32) as u8))
    }
}

/// Configuration for the [`Engine`][`crate::search::Engine`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Options {
    /// The size of the transposition table.
    pub hash: HashSize,

    /// The quiescence search extension.
    pub quiescence: QuiescenceDepth,
}
