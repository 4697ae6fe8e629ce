use crate::chess::{MATERIAL, Uci, value};
use crate::rules::{Rules, Zobrist};
use derive_more::with_trait::{Debug, Display, Error, From};
use shakmaty::fen::{Fen, ParseFenError};
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Piece, Position as _, Role, Square};
use std::fmt::{self, Formatter};
use std::str::FromStr;

#[cfg(test)]
use proptest::{collection::vec, prelude::*, sample::Selector};

/// The current chess position together with the positions that led to it.
///
/// Moves are applied in place with [`Rules::push`] and taken back with
/// [`Rules::pop`], which restores the exact prior state.
#[derive(Debug, Clone, Default)]
#[debug("Position({self})")]
pub struct Position {
    chess: Chess,
    history: Vec<Chess>,
}

#[cfg(test)]
impl Arbitrary for Position {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        vec(any::<Selector>(), 0..48)
            .prop_map(|selectors| {
                let mut pos = Position::default();

                for selector in selectors {
                    let moves = pos.moves();
                    if moves.is_empty() || pos.is_insufficient_material() {
                        break;
                    }

                    pos.push(selector.select(moves));
                }

                pos
            })
            .boxed()
    }
}

impl Position {
    /// Wraps a [`Chess`] position with an empty history.
    #[inline(always)]
    pub fn new(chess: Chess) -> Self {
        Position {
            chess,
            history: Vec::new(),
        }
    }

    /// The underlying [`Chess`] position.
    #[inline(always)]
    pub fn chess(&self) -> &Chess {
        &self.chess
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.chess.turn()
    }

    /// The number of moves that can be taken back.
    #[inline(always)]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// The [`Piece`] on a [`Square`], if any.
    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.chess.board().piece_at(sq)
    }

    /// The material of one side in centipawns.
    pub fn material_of(&self, side: Color) -> i32 {
        let board = self.chess.board();
        MATERIAL
            .iter()
            .map(|&r| (board.by_color(side) & board.by_role(r)).count() as i32 * value(r))
            .sum()
    }

    /// Finds the legal move matching a UCI move string.
    pub fn parse_move(&self, s: &str) -> Option<Move> {
        self.moves().into_iter().find(|m| Uci(m) == *s)
    }
}

impl PartialEq for Position {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Position {}

impl Rules for Position {
    type Move = Move;

    #[inline(always)]
    fn push(&mut self, m: Move) {
        let prev = self.chess.clone();
        self.chess.play_unchecked(&m);
        self.history.push(prev);
    }

    #[inline(always)]
    fn pop(&mut self) {
        if let Some(prev) = self.history.pop() {
            self.chess = prev;
        }
    }

    #[inline(always)]
    fn moves(&self) -> Vec<Move> {
        self.chess.legal_moves().into_iter().collect()
    }

    #[inline(always)]
    fn is_checkmate(&self) -> bool {
        self.chess.is_checkmate()
    }

    #[inline(always)]
    fn is_stalemate(&self) -> bool {
        self.chess.is_stalemate()
    }

    #[inline(always)]
    fn is_insufficient_material(&self) -> bool {
        self.chess.is_insufficient_material()
    }

    #[inline(always)]
    fn is_capture(&self, m: &Move) -> bool {
        m.is_capture()
    }

    fn gives_check(&self, m: &Move) -> bool {
        let mut next = self.chess.clone();
        next.play_unchecked(m);
        next.is_check()
    }

    #[inline(always)]
    fn mover(&self, m: &Move) -> Role {
        m.role()
    }

    #[inline(always)]
    fn captured(&self, m: &Move) -> Option<Role> {
        m.capture()
    }

    #[inline(always)]
    fn promotion(&self, m: &Move) -> Option<Role> {
        m.promotion()
    }

    fn advance(&self, m: &Move) -> Option<u8> {
        if m.role() != Role::Pawn || m.is_capture() {
            return None;
        }

        let rank = m.to().rank() as u8;
        match self.turn() {
            Color::White => Some(rank - 1),
            Color::Black => Some(6 - rank),
        }
    }

    #[inline(always)]
    fn material(&self) -> i32 {
        let turn = self.turn();
        self.material_of(turn) - self.material_of(!turn)
    }

    #[inline(always)]
    fn zobrist(&self) -> Zobrist {
        self.chess.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let fen = Fen::from_position(self.chess.clone(), EnPassantMode::Legal);
        Display::fmt(&fen, f)
    }
}

/// The reason why parsing the FEN string failed.
#[derive(Debug, Display, Error, From)]
pub enum ParsePositionError {
    #[display("failed to parse position")]
    InvalidFen(ParseFenError),
    #[display("illegal position")]
    IllegalPosition,
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fen: Fen = s.trim().parse()?;
        let chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|_| ParsePositionError::IllegalPosition)?;

        Ok(Position::new(chess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Debug;
    use test_strategy::proptest;

    #[test]
    fn default_is_the_starting_position() {
        assert_eq!(
            Position::default().to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[proptest]
    fn parsing_printed_position_is_an_identity(pos: Position) {
        assert_eq!(pos.to_string().parse::<Position>().ok(), Some(pos));
    }

    #[proptest]
    fn parsing_position_fails_for_invalid_fen(#[strategy("[^/ ]{1,12}")] s: String) {
        assert!(matches!(
            s.parse::<Position>(),
            Err(ParsePositionError::InvalidFen(_))
        ));
    }

    #[test]
    fn parsing_position_fails_for_illegal_position() {
        assert!(matches!(
            "8/8/8/8/8/8/8/8 w - - 0 1".parse::<Position>(),
            Err(ParsePositionError::IllegalPosition)
        ));
    }

    #[proptest]
    fn pop_restores_the_position_prior_to_push(
        #[filter(!#pos.moves().is_empty())] mut pos: Position,
        #[map(|s: Selector| s.select(#pos.moves()))] m: Move,
    ) {
        let before = pos.clone();
        pos.push(m);
        assert_ne!(pos.zobrist(), before.zobrist());
        pos.pop();
        assert_eq!(pos, before);
        assert_eq!(pos.zobrist(), before.zobrist());
        assert_eq!(pos.ply(), before.ply());
    }

    #[proptest]
    fn played_guard_takes_the_move_back(
        #[filter(!#pos.moves().is_empty())] mut pos: Position,
        #[map(|s: Selector| s.select(#pos.moves()))] m: Move,
    ) {
        let before = pos.clone();

        {
            let next = pos.play(m);
            assert_eq!(next.ply(), before.ply() + 1);
        }

        assert_eq!(pos, before);
    }

    #[proptest]
    fn material_is_antisymmetric(pos: Position) {
        let turn = pos.turn();
        assert_eq!(pos.material(), pos.material_of(turn) - pos.material_of(!turn));
    }

    #[proptest]
    fn gives_check_agrees_with_the_resulting_position(
        #[filter(!#pos.moves().is_empty())] mut pos: Position,
        #[map(|s: Selector| s.select(#pos.moves()))] m: Move,
    ) {
        let check = pos.gives_check(&m);
        assert_eq!(pos.play(m).chess().is_check(), check);
    }

    #[proptest]
    fn every_legal_move_can_be_parsed_back(
        #[filter(!#pos.moves().is_empty())] pos: Position,
        #[map(|s: Selector| s.select(#pos.moves()))] m: Move,
    ) {
        assert_eq!(pos.parse_move(&Uci(&m).to_string()), Some(m));
    }

    #[test]
    fn piece_at_reads_the_board() {
        let pos = Position::default();
        assert_eq!(pos.piece_at(Square::E1), Some(Color::White.king()));
        assert_eq!(pos.piece_at(Square::E4), None);
    }

    #[test]
    fn advance_counts_ranks_from_the_pawn_start() {
        let pos = Position::default();
        let double = pos.parse_move("e2e4").unwrap();
        let knight = pos.parse_move("g1f3").unwrap();
        assert_eq!(pos.advance(&double), Some(2));
        assert_eq!(pos.advance(&knight), None);
    }
}
