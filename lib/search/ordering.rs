use crate::chess::{Role, value};
use crate::rules::Rules;
use crate::search::ADVANTAGE;
use std::cmp::Reverse;

/// Sorts moves so that the most promising are searched first.
///
/// The transposition hint leads, followed by the two killers for the current
/// depth, and then everything else by a static rating. Moves that rate the
/// same keep the order in which the rules engine enumerated them.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MoveOrderer;

impl MoveOrderer {
    const CHECK: i32 = 500;
    const TRADE: i32 = 50;
    const ADVANCE: i32 = 10;

    /// Rates a move by how likely it is to be good.
    pub fn rate<P: Rules>(pos: &P, m: &P::Move, ahead: bool) -> i32 {
        let mut rating = 0;

        if let Some(victim) = pos.captured(m) {
            let attacker = value(pos.mover(m)).min(1000);
            rating += value(victim) * 10 - attacker / 10;

            if ahead {
                rating += Self::TRADE;
            }
        }

        if pos.gives_check(m) {
            rating += Self::CHECK;
        }

        match pos.promotion(m) {
            None | Some(Role::Pawn | Role::King) => {}
            Some(role) => rating += value(role),
        }

        if ahead {
            if let Some(ranks) = pos.advance(m) {
                rating += Self::ADVANCE * ranks as i32;
            }
        }

        rating
    }

    /// Orders `moves` in place.
    ///
    /// A `hint` or killer that is not among `moves` has no effect.
    pub fn order<P: Rules>(
        pos: &P,
        moves: &mut Vec<P::Move>,
        hint: Option<&P::Move>,
        killers: [Option<&P::Move>; 2],
    ) {
        let ahead = pos.material() >= ADVANTAGE;

        let mut rated: Vec<_> = moves
            .drain(..)
            .map(|m| {
                let tier = if Some(&m) == hint {
                    3
                } else if Some(&m) == killers[0] {
                    2
                } else if Some(&m) == killers[1] {
                    1
                } else {
                    0
                };

                let rating = if tier > 0 { 0 } else { Self::rate(pos, &m, ahead) };
                (m, (tier, rating))
            })
            .collect();

        rated.sort_by_key(|&(_, key)| Reverse(key));
        moves.extend(rated.into_iter().map(|(m, _)| m));
    }
}
