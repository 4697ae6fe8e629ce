use crate::chess::{MATERIAL, Position, value};
use crate::eval::{Evaluator, Value};
use shakmaty::{Bitboard, Board, Color, Position as _, Role, Square};

#[rustfmt::skip]
const PAWN: [i16; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    50,  50,  50,  50,  50,  50,  50,  50,
    10,  10,  20,  30,  30,  20,  10,  10,
     5,   5,  10,  25,  25,  10,   5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     5,  10,  10, -20, -20,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [i16; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [i16; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   5,   5,  10,  10,   5,   5, -10,
   -10,   0,  10,  10,  10,  10,   0, -10,
   -10,  10,  10,  10,  10,  10,  10, -10,
   -10,   5,   0,   0,   0,   0,   5, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK: [i16; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10,  10,  10,  10,  10,   5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN: [i16; 64] = [
   -20, -10, -10,  -5,  -5, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,   5,   5,   5,   0, -10,
    -5,   0,   5,   5,   5,   5,   0,  -5,
     0,   0,   5,   5,   5,   5,   0,  -5,
   -10,   5,   5,   5,   5,   5,   0, -10,
   -10,   0,   5,   0,   0,   0,   0, -10,
   -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME: [i16; 64] = [
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -20, -30, -30, -40, -40, -30, -30, -20,
   -10, -20, -20, -20, -20, -20, -20, -10,
    20,  20,   0,   0,   0,   0,  20,  20,
    20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_ENDGAME: [i16; 64] = [
   -50, -40, -30, -20, -20, -30, -40, -50,
   -30, -20, -10,   0,   0, -10, -20, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -30,   0,   0,   0,   0, -30, -30,
   -50, -30, -30, -30, -30, -30, -30, -50,
];

const CENTER: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

/// A hand-crafted evaluator built from material, piece-square tables and a
/// handful of positional terms.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Classical;

impl Classical {
    /// Total non-king material below which kings are expected to centralize.
    pub const ENDGAME_MATERIAL: i32 = 1500;

    /// The game phase, from 0 in the opening to 1 with bare kings.
    pub fn phase(board: &Board) -> f32 {
        let material: i32 = MATERIAL
            .iter()
            .map(|&r| board.by_role(r).count() as i32 * value(r))
            .sum();

        1. - (material as f32 / (14 * value(Role::Queen)) as f32).min(1.)
    }

    /// Material and piece-square terms from White's point of view.
    fn material(board: &Board) -> i32 {
        let nonking: i32 = MATERIAL
            .iter()
            .map(|&r| board.by_role(r).count() as i32 * value(r))
            .sum();

        let endgame = nonking < Self::ENDGAME_MATERIAL;
        let mut score = 0;

        for sq in board.occupied() {
            let Some(piece) = board.piece_at(sq) else { continue };
            let table = match piece.role {
                Role::Pawn => &PAWN,
                Role::Knight => &KNIGHT,
                Role::Bishop => &BISHOP,
                Role::Rook => &ROOK,
                Role::Queen => &QUEEN,
                Role::King if endgame => &KING_ENDGAME,
                Role::King => &KING_MIDDLEGAME,
            };

            let idx = match piece.color {
                Color::White => sq as usize ^ 56,
                Color::Black => sq as usize,
            };

            let worth = table[idx] as i32
                + match piece.role {
                    Role::King => 0,
                    r => value(r),
                };

            score += sign(piece.color) * worth;
        }

        score
    }

    /// Doubled, isolated and passed pawns from White's point of view.
    fn pawns(board: &Board) -> i32 {
        let mut score = 0;

        for side in [Color::White, Color::Black] {
            let ours = board.by_color(side) & board.by_role(Role::Pawn);
            let theirs = board.by_color(!side) & board.by_role(Role::Pawn);

            let mut files = [0u32; 8];
            for sq in ours {
                files[sq.file() as usize] += 1;
            }

            for (f, &n) in files.iter().enumerate() {
                if n > 1 {
                    score -= sign(side) * 20;
                }

                let left = f.checked_sub(1).map_or(0, |l| files[l]);
                let right = files.get(f + 1).copied().unwrap_or(0);
                if n > 0 && left == 0 && right == 0 {
                    score -= sign(side) * 10;
                }
            }

            for sq in ours {
                if is_passed(sq, side, theirs) {
                    score += sign(side) * 50;
                }
            }
        }

        score
    }

    /// Attacks on and occupation of the four central squares from White's point of view.
    fn center(board: &Board) -> i32 {
        let occupied = board.occupied();
        let mut score = 0;

        for sq in CENTER {
            let white = board.attacks_to(sq, Color::White, occupied).count() as i32;
            let black = board.attacks_to(sq, Color::Black, occupied).count() as i32;
            score += 10 * (white - black);

            if let Some(piece) = board.piece_at(sq) {
                score += sign(piece.color) * 20;
            }
        }

        score
    }

    /// Penalties for pieces with almost nowhere to go from White's point of view.
    ///
    /// Every attacked square counts towards mobility, including those held by friendly pieces.
    fn trapped(board: &Board) -> i32 {
        let mut score = 0;

        for sq in board.occupied() {
            let Some(piece) = board.piece_at(sq) else { continue };
            if piece.role == Role::Pawn {
                continue;
            }

            let mobility = board.attacks_from(sq).count();
            if mobility <= 2 {
                score -= sign(piece.color) * value(piece.role) / 4;
            }

            if piece.role == Role::Bishop && mobility <= 3 {
                score -= sign(piece.color) * 50;
            }
        }

        score
    }

    /// Pieces defended by their own side, worth more in the middle of the board.
    fn coordination(board: &Board) -> i32 {
        let occupied = board.occupied();
        let mut score = 0;

        for sq in occupied & !board.kings() {
            let Some(piece) = board.piece_at(sq) else { continue };
            let defenders = board.attacks_to(sq, piece.color, occupied).count() as i32;
            let central = (2..=5).contains(&(sq.file() as u32)) && (2..=5).contains(&(sq.rank() as u32));
            let bonus = if central { 8 } else { 5 };
            score += sign(piece.color) * bonus * defenders;
        }

        score
    }

    /// Minor and major pieces bearing down on the enemy king, closer is better.
    fn tropism(board: &Board) -> i32 {
        let occupied = board.occupied();
        let attackers = occupied & !board.pawns() & !board.kings();
        let mut score = 0;

        for side in [Color::White, Color::Black] {
            let Some(king) = board.king_of(!side) else { continue };
            for sq in board.attacks_to(king, side, occupied) & attackers {
                score += sign(side) * 2 * (8 - sq.distance(king) as i32);
            }
        }

        score
    }
}

impl Evaluator<Position> for Classical {
    fn evaluate(&self, pos: &Position) -> Value {
        let board = pos.chess().board();

        let mut score = Self::material(board) + Self::pawns(board) + Self::trapped(board);
        if Self::phase(board) < 0.7 {
            score += Self::center(board) + Self::coordination(board) + Self::tropism(board);
        } else {
            score += Self::center(board) / 2;
        }

        sign(pos.turn()) * score + 10
    }
}

#[inline(always)]
fn sign(side: Color) -> i32 {
    match side {
        Color::White => 1,
        Color::Black => -1,
    }
}

fn is_passed(sq: Square, side: Color, theirs: Bitboard) -> bool {
    let (file, rank) = (sq.file() as i32, sq.rank() as i32);

    !theirs.into_iter().any(|t| {
        let (f, r) = (t.file() as i32, t.rank() as i32);
        (f - file).abs() <= 1
            && match side {
                Color::White => r > rank,
                Color::Black => r < rank,
            }
    })
}
