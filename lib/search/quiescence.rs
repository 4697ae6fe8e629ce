use crate::eval::Evaluator;
use crate::rules::Rules;
use crate::search::{ControlFlow, Interrupt, MoveOrderer, Ply, Score, Stack};
use std::ops::Range;

impl<P: Rules, E: Evaluator<P>> Stack<'_, P, E> {
    /// A generous bound on how much a single capture can swing the score.
    const DELTA: i32 = 900;

    /// Resolves captures and checks past the horizon, so that positions are
    /// only ever scored statically when they are quiet.
    ///
    /// The side to move may always stand pat on the static evaluation.
    pub(super) fn quiesce(
        &mut self,
        pos: &mut P,
        bounds: Range<Score>,
        depth: u8,
        ply: Ply,
    ) -> Result<Score, Interrupt> {
        if self.ctrl.check() == ControlFlow::Abort {
            return Err(Interrupt);
        }

        if let Some(score) = self.outcome(pos, ply) {
            return Ok(score);
        }

        let (mut alpha, beta) = (bounds.start, bounds.end);
        let stand_pat = Score::from(self.evaluator.evaluate(pos));

        if stand_pat >= beta || depth == 0 {
            return Ok(stand_pat);
        } else if stand_pat.get().saturating_add(Self::DELTA) < alpha.get() {
            return Ok(stand_pat);
        }

        alpha = alpha.max(stand_pat);
        let mut best = stand_pat;

        let mut moves = pos.moves();
        moves.retain(|m| pos.is_capture(m) || pos.gives_check(m));
        MoveOrderer::order(pos, &mut moves, None, [None, None]);

        for m in moves {
            let score = -self.quiesce(&mut pos.play(m), -beta..-alpha, depth - 1, ply + 1)?;
            best = best.max(score);
            alpha = alpha.max(score);

            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}
