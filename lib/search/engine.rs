use crate::chess::Position;
use crate::eval::{Classical, Evaluator};
use crate::rules::Rules;
use crate::search::*;
use derive_more::with_trait::{Display, Error};
use std::ops::Range;
use tracing::{debug, instrument};

#[cfg(test)]
use proptest::prelude::*;

/// Indicates the search was interrupted.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Error)]
#[display("the search was interrupted")]
pub struct Interrupt;

/// The per-search state shared by every node.
#[derive(Debug)]
pub(super) struct Stack<'a, P: Rules, E> {
    pub(super) evaluator: &'a E,
    pub(super) tt: &'a mut TranspositionTable<P::Move>,
    pub(super) killers: &'a mut Killers<P::Move>,
    pub(super) ctrl: Control<'a>,
    pub(super) quiescence: QuiescenceDepth,
}

impl<'a, P: Rules, E: Evaluator<P>> Stack<'a, P, E> {
    const CONTEMPT: i32 = 50;

    pub(super) fn new(
        evaluator: &'a E,
        tt: &'a mut TranspositionTable<P::Move>,
        killers: &'a mut Killers<P::Move>,
        ctrl: Control<'a>,
        quiescence: QuiescenceDepth,
    ) -> Self {
        Stack {
            evaluator,
            tt,
            killers,
            ctrl,
            quiescence,
        }
    }

    /// The drawn score, shaded against the side that is materially ahead.
    pub(super) fn draw(&self, pos: &P) -> Score {
        match pos.material() {
            m if m >= ADVANTAGE => Score::new(-Self::CONTEMPT),
            m if m <= -ADVANTAGE => Score::new(Self::CONTEMPT),
            _ => Score::DRAW,
        }
    }

    /// The score of a position that ended the game, if it did.
    pub(super) fn outcome(&self, pos: &P, ply: Ply) -> Option<Score> {
        if pos.is_checkmate() {
            Some(Score::mated(ply))
        } else if pos.is_stalemate() || pos.is_insufficient_material() {
            Some(self.draw(pos))
        } else {
            None
        }
    }

    /// The negamax search with alpha-beta pruning.
    pub(super) fn nm(
        &mut self,
        pos: &mut P,
        bounds: Range<Score>,
        depth: Depth,
        ply: Ply,
    ) -> Result<Score, Interrupt> {
        if depth == 0 || ply >= MAX_PLY - Ply::from(QuiescenceDepth::MAX) {
            return self.quiesce(pos, bounds, self.quiescence.get(), ply);
        }

        if self.ctrl.check() == ControlFlow::Abort {
            return Err(Interrupt);
        }

        if let Some(score) = self.outcome(pos, ply) {
            return Ok(score);
        }

        let zobrist = pos.zobrist();
        let hint = match self.tt.load(zobrist) {
            None => None,
            Some(t) => {
                if t.depth() >= depth {
                    if let Some(score) = t.score().cutoff(&bounds, ply) {
                        return Ok(score);
                    }
                }

                t.best().cloned()
            }
        };

        let (mut alpha, beta) = (bounds.start, bounds.end);
        let mut moves = pos.moves();
        MoveOrderer::order(pos, &mut moves, hint.as_ref(), self.killers.get(depth));

        let (mut head, mut tail) = (None, Score::lower());
        for m in moves {
            let score = -self.nm(&mut pos.play(m.clone()), -beta..-alpha, depth - 1, ply + 1)?;

            if score > tail || head.is_none() {
                (head, tail) = (Some(m), score);
            }

            if tail >= beta {
                if let Some(best) = &head {
                    self.killers.record(best.clone(), depth);
                }

                break;
            }

            alpha = alpha.max(tail);
        }

        let score = ScoreBound::new(bounds, tail, ply);
        self.tt.store(zobrist, Transposition::new(score, depth, head));
        Ok(tail)
    }

    /// The root of the negamax search.
    pub(super) fn root(&mut self, pos: &mut P, depth: Depth) -> Result<(P::Move, Score), Interrupt> {
        if self.ctrl.check() == ControlFlow::Abort {
            return Err(Interrupt);
        }

        let zobrist = pos.zobrist();
        let hint = self.tt.load(zobrist).and_then(|t| t.best().cloned());
        let mut moves = pos.moves();
        MoveOrderer::order(pos, &mut moves, hint.as_ref(), self.killers.get(depth));

        let bounds = Score::lower()..Score::upper();
        let (mut alpha, beta) = (bounds.start, bounds.end);
        let (mut head, mut tail) = (None, Score::lower());

        for m in moves {
            let score = -self.nm(&mut pos.play(m.clone()), -beta..-alpha, depth - 1, 1)?;

            if score > tail || head.is_none() {
                (head, tail) = (Some(m), score);
            }

            alpha = alpha.max(tail);
        }

        let Some(best) = head else {
            return Err(Interrupt);
        };

        let score = ScoreBound::new(bounds, tail, 0);
        self.tt.store(zobrist, Transposition::new(score, depth, Some(best.clone())));
        Ok((best, tail))
    }

    /// Follows the best moves recorded in the transposition table.
    pub(super) fn pv(&self, pos: &mut P, head: P::Move, depth: Depth) -> Line<P::Move> {
        let mut line = Line::new();
        line.push(head.clone());
        pos.push(head);

        while line.len() < depth as usize && !line.is_full() {
            let Some(m) = self.tt.load(pos.zobrist()).and_then(|t| t.best().cloned()) else {
                break;
            };

            if !pos.moves().contains(&m) {
                break;
            }

            line.push(m.clone());
            pos.push(m);
        }

        for _ in &line {
            pos.pop();
        }

        line
    }

    /// Scores every legal move one ply deep, best first.
    ///
    /// Returns [`None`] if a stop is requested before every move is scored.
    pub(super) fn scan(&self, pos: &mut P) -> Option<Vec<(P::Move, Score)>> {
        let mut scored = Vec::new();

        for m in pos.moves() {
            if self.ctrl.is_stopped() {
                return None;
            }

            let next = pos.play(m.clone());
            let score = match self.outcome(&next, 1) {
                Some(score) => -score,
                None => -Score::from(self.evaluator.evaluate(&next)),
            };

            scored.push((m, score));
        }

        scored.sort_by_key(|&(_, s)| std::cmp::Reverse(s));
        Some(scored)
    }
}

/// A chess engine.
#[derive(Debug)]
pub struct Engine<P: Rules = Position, E = Classical> {
    evaluator: E,
    tt: TranspositionTable<P::Move>,
    killers: Killers<P::Move>,
    stopper: Stopper,
    options: Options,
}

#[cfg(test)]
impl Arbitrary for Engine {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        any::<Options>()
            .prop_map(|o| Engine::with_options(&o))
            .boxed()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Initializes the engine with the default [`Options`].
    pub fn new() -> Self {
        Self::with_options(&Options::default())
    }

    /// Initializes the engine with the given [`Options`].
    pub fn with_options(options: &Options) -> Self {
        Self::with_evaluator(Classical, options)
    }
}

impl<P: Rules, E: Evaluator<P>> Engine<P, E> {
    /// Initializes the engine with a custom [`Evaluator`].
    pub fn with_evaluator(evaluator: E, options: &Options) -> Self {
        Engine {
            evaluator,
            tt: TranspositionTable::new(options.hash),
            killers: Killers::new(),
            stopper: Stopper::default(),
            options: *options,
        }
    }

    /// The current [`Options`].
    #[inline(always)]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The static [`Evaluator`].
    #[inline(always)]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Resizes the transposition table, discarding its contents.
    pub fn set_hash(&mut self, hash: HashSize) {
        self.options.hash = hash;
        self.tt.resize(hash);
    }

    /// Changes how far the quiescence search may extend.
    pub fn set_quiescence(&mut self, quiescence: QuiescenceDepth) {
        self.options.quiescence = quiescence;
    }

    /// Forgets everything learned from previous searches.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.killers.clear();
    }

    /// A handle that can interrupt a search from another thread.
    ///
    /// A stop request stays in effect until [`Stopper::reset`] is called.
    #[inline(always)]
    pub fn stopper(&self) -> Stopper {
        self.stopper.clone()
    }

    /// Finds the best move within `limits`.
    ///
    /// Returns [`None`] only if there are no legal moves.
    pub fn find_best_move(&mut self, pos: &mut P, limits: &Limits) -> Option<P::Move> {
        self.search(pos, limits, |_| {})
            .and_then(|info| info.best().cloned())
    }

    /// Searches by iterative deepening, calling `on_info` after every completed depth.
    ///
    /// The result comes from the deepest completed iteration. If none
    /// completes, every legal move is scored one ply deep instead, and if even
    /// that is interrupted the first legal move is returned.
    #[instrument(level = "debug", skip_all, fields(limits = ?limits))]
    pub fn search<F>(&mut self, pos: &mut P, limits: &Limits, mut on_info: F) -> Option<Info<P::Move>>
    where
        F: FnMut(&Info<P::Move>),
    {
        self.killers.clear();
        let first = pos.moves().into_iter().next()?;
        let ahead = pos.material() >= ADVANTAGE;

        let ctrl = Control::new(&self.stopper, limits.clone());
        let quiescence = self.options.quiescence;
        let mut stack = Stack::new(&self.evaluator, &mut self.tt, &mut self.killers, ctrl, quiescence);
        let mut best: Option<Info<P::Move>> = None;

        for depth in 1..=limits.max_depth() {
            let (head, score) = match stack.root(pos, depth) {
                Err(Interrupt) => break,
                Ok(result) => result,
            };

            let pv = stack.pv(pos, head, depth);
            let info = Info::new(depth, stack.ctrl.elapsed(), stack.ctrl.nodes(), score, pv);
            debug!(depth, %score, nodes = info.nodes(), time = ?info.time(), "completed iteration");

            on_info(&info);
            best = Some(info);

            if stack.ctrl.iterate(score, ahead) == ControlFlow::Stop {
                break;
            }
        }

        if best.is_some() {
            return best;
        }

        let (time, nodes) = (stack.ctrl.elapsed(), stack.ctrl.nodes());
        let (m, score) = match stack.scan(pos).and_then(|s| s.into_iter().next()) {
            Some(best) => best,
            None => (first, Score::DRAW),
        };

        let mut pv = Line::new();
        pv.push(m);
        let info = Info::new(0, time, nodes, score, pv);

        debug!(best = ?info.best(), "no iteration completed, falling back");
        on_info(&info);
        Some(info)
    }

    /// Scores every legal move one ply deep, best first.
    ///
    /// Pending stop requests do not apply.
    pub fn rank(&mut self, pos: &mut P) -> Vec<(P::Move, Score)> {
        let stopper = Stopper::default();
        let ctrl = Control::new(&stopper, Limits::none());
        let quiescence = self.options.quiescence;
        let stack = Stack::new(&self.evaluator, &mut self.tt, &mut self.killers, ctrl, quiescence);
        stack.scan(pos).unwrap_or_default()
    }
}
