use crate::chess::Move;
use crate::rules::Zobrist;
use crate::search::{Depth, HashSize, Ply, Score};
use derive_more::with_trait::Debug;
use rustc_hash::FxHashMap;
use std::ops::{Range, RangeInclusive};

/// Whether the transposed score is exact or a bound.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum ScoreBound {
    Lower(Score),
    Upper(Score),
    Exact(Score),
}

impl ScoreBound {
    /// Constructs a [`ScoreBound`] normalized to [`Ply`].
    #[inline(always)]
    pub fn new(bounds: Range<Score>, score: Score, ply: Ply) -> Self {
        debug_assert!(bounds.start < bounds.end);

        if score >= bounds.end {
            ScoreBound::Lower(score.relative_to_root(ply))
        } else if score <= bounds.start {
            ScoreBound::Upper(score.relative_to_root(ply))
        } else {
            ScoreBound::Exact(score.relative_to_root(ply))
        }
    }

    /// The score bound.
    #[inline(always)]
    pub fn bound(&self, ply: Ply) -> Score {
        match *self {
            ScoreBound::Lower(s) | ScoreBound::Upper(s) | ScoreBound::Exact(s) => {
                s.relative_to_ply(ply)
            }
        }
    }

    /// A lower bound for the score normalized to [`Ply`].
    #[inline(always)]
    pub fn lower(&self, ply: Ply) -> Score {
        match *self {
            ScoreBound::Upper(_) => Score::mated(ply),
            _ => self.bound(ply),
        }
    }

    /// An upper bound for the score normalized to [`Ply`].
    #[inline(always)]
    pub fn upper(&self, ply: Ply) -> Score {
        match *self {
            ScoreBound::Lower(_) => Score::mating(ply),
            _ => self.bound(ply),
        }
    }

    /// The score range normalized to [`Ply`].
    #[inline(always)]
    pub fn range(&self, ply: Ply) -> RangeInclusive<Score> {
        self.lower(ply)..=self.upper(ply)
    }

    /// The score at `ply`, if it settles a search within `bounds`.
    #[inline(always)]
    pub fn cutoff(&self, bounds: &Range<Score>, ply: Ply) -> Option<Score> {
        let score = self.bound(ply);
        match *self {
            ScoreBound::Exact(_) => Some(score),
            ScoreBound::Lower(_) if score >= bounds.end => Some(score),
            ScoreBound::Upper(_) if score <= bounds.start => Some(score),
            _ => None,
        }
    }
}

/// A partial search result.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Transposition<M = Move> {
    score: ScoreBound,
    depth: Depth,
    best: Option<M>,
}

impl<M> Transposition<M> {
    /// Constructs a [`Transposition`] given a [`ScoreBound`], the [`Depth`] searched, and the best move.
    #[inline(always)]
    pub fn new(score: ScoreBound, depth: Depth, best: Option<M>) -> Self {
        Transposition { score, depth, best }
    }

    /// The score bound.
    #[inline(always)]
    pub fn score(&self) -> ScoreBound {
        self.score
    }

    /// The depth searched.
    #[inline(always)]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// The best move.
    #[inline(always)]
    pub fn best(&self) -> Option<&M> {
        self.best.as_ref()
    }
}

/// A cache of [`Transposition`]s keyed by position hash.
///
/// Every store replaces whatever was kept for the same key, and the whole
/// table is cleared once it is full. Keys are not verified, so two positions
/// whose hashes collide share an entry.
#[derive(Debug)]
#[debug("TranspositionTable({}/{})", map.len(), capacity)]
pub struct TranspositionTable<M = Move> {
    map: FxHashMap<Zobrist, Transposition<M>>,
    capacity: usize,
}

impl<M> TranspositionTable<M> {
    #[inline(always)]
    fn size_to_len(size: HashSize) -> usize {
        size.bytes() / size_of::<(Zobrist, Transposition<M>)>()
    }

    /// Constructs an empty table holding at most as many entries as fit in `size`.
    #[inline(always)]
    pub fn new(size: HashSize) -> Self {
        TranspositionTable {
            map: FxHashMap::default(),
            capacity: Self::size_to_len(size),
        }
    }

    /// Clears the table and changes its capacity.
    #[inline(always)]
    pub fn resize(&mut self, size: HashSize) {
        self.map = FxHashMap::default();
        self.capacity = Self::size_to_len(size);
    }

    /// The maximum number of entries.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table holds no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Forgets every entry.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Stores a [`Transposition`], replacing any previous entry for `zobrist`.
    #[inline(always)]
    pub fn store(&mut self, zobrist: Zobrist, tpos: Transposition<M>) {
        if self.capacity == 0 {
            return;
        }

        if self.map.len() >= self.capacity && !self.map.contains_key(&zobrist) {
            self.map.clear();
        }

        self.map.insert(zobrist, tpos);
    }

    /// Looks up the [`Transposition`] for `zobrist`.
    #[inline(always)]
    pub fn load(&self, zobrist: Zobrist) -> Option<&Transposition<M>> {
        self.map.get(&zobrist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MAX_PLY;
    use std::fmt::Debug;
    use test_strategy::proptest;

    type Table = TranspositionTable<u16>;

    fn tpos(s: Score, d: Depth, m: u16) -> Transposition<u16> {
        Transposition::new(ScoreBound::Exact(s), d, Some(m))
    }

    #[proptest]
    fn bound_returns_score_bound(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[filter(!#s.is_mate())] s: Score,
        #[strategy(0..MAX_PLY)] p: Ply,
    ) {
        assert_eq!(ScoreBound::new(b, s, p).bound(p), s);
    }

    #[proptest]
    fn mate_scores_survive_normalization(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[strategy(0..MAX_PLY / 2)] p: Ply,
        #[strategy(#p..MAX_PLY)] q: Ply,
    ) {
        let s = Score::mating(q);
        assert_eq!(ScoreBound::new(b, s, p).bound(p), s);
    }

    #[proptest]
    fn bound_is_within_range(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[filter(!#s.is_mate())] s: Score,
        #[strategy(0..MAX_PLY)] p: Ply,
    ) {
        assert!(ScoreBound::new(b, s, p).range(p).contains(&s));
    }

    #[proptest]
    fn fail_high_is_a_lower_bound(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[filter(!#s.is_mate() && #s >= #b.end)] s: Score,
    ) {
        assert_eq!(ScoreBound::new(b, s, 0), ScoreBound::Lower(s));
    }

    #[proptest]
    fn fail_low_is_an_upper_bound(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[filter(!#s.is_mate() && #s <= #b.start)] s: Score,
    ) {
        assert_eq!(ScoreBound::new(b, s, 0), ScoreBound::Upper(s));
    }

    #[proptest]
    fn exact_bound_always_cuts_off(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[filter(!#s.is_mate())] s: Score,
    ) {
        assert_eq!(ScoreBound::Exact(s).cutoff(&b, 0), Some(s));
    }

    #[proptest]
    fn lower_bound_cuts_off_only_above_beta(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[filter(!#s.is_mate())] s: Score,
    ) {
        let expected = (s >= b.end).then_some(s);
        assert_eq!(ScoreBound::Lower(s).cutoff(&b, 0), expected);
    }

    #[proptest]
    fn upper_bound_cuts_off_only_below_alpha(
        #[filter(#b.start < #b.end)] b: Range<Score>,
        #[filter(!#s.is_mate())] s: Score,
    ) {
        let expected = (s <= b.start).then_some(s);
        assert_eq!(ScoreBound::Upper(s).cutoff(&b, 0), expected);
    }

    #[proptest]
    fn load_does_nothing_if_hash_size_is_zero(k: Zobrist, s: Score, d: Depth, m: u16) {
        let mut tt = Table::new(HashSize::new(0));
        tt.store(k, tpos(s, d, m));
        assert_eq!(tt.load(k), None);
    }

    #[proptest]
    fn load_returns_none_if_key_does_not_match(k: Zobrist, s: Score, d: Depth, m: u16) {
        let mut tt = Table::new(HashSize::new(1));
        tt.store(k, tpos(s, d, m));
        assert_eq!(tt.load(!k), None);
    }

    #[proptest]
    fn load_returns_stored_entry(k: Zobrist, s: Score, d: Depth, m: u16) {
        let mut tt = Table::new(HashSize::new(1));
        tt.store(k, tpos(s, d, m));
        assert_eq!(tt.load(k), Some(&tpos(s, d, m)));
    }

    #[proptest]
    fn store_always_replaces(k: Zobrist, s: Score, t: Score, d: Depth, e: Depth, m: u16) {
        let mut tt = Table::new(HashSize::new(1));
        tt.store(k, tpos(s, d, m));
        tt.store(k, tpos(t, e, m));
        assert_eq!(tt.load(k), Some(&tpos(t, e, m)));
    }

    #[test]
    fn table_is_cleared_when_full() {
        let mut tt = Table::new(HashSize::new(1));
        let capacity = tt.capacity() as u64;

        for k in 0..capacity {
            tt.store(k, tpos(Score::DRAW, 1, 0));
        }

        assert_eq!(tt.len() as u64, capacity);
        tt.store(capacity, tpos(Score::DRAW, 1, 0));
        assert_eq!(tt.len(), 1);
        assert_eq!(tt.load(0), None);
        assert!(tt.load(capacity).is_some());
    }

    #[proptest]
    fn size_is_an_upper_limit(#[strategy(0..=4usize)] s: usize) {
        let tt = Table::new(HashSize::new(s));
        assert!(tt.capacity() * size_of::<(Zobrist, Transposition<u16>)>() <= HashSize::new(s).bytes());
    }
}
