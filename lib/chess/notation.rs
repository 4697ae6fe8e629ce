use shakmaty::{File, Move, Square};
use std::fmt::{self, Display, Formatter};

/// Formats a [`Move`] in the long algebraic notation used by UCI.
///
/// Castling is written as the king's two-square step, e.g. `e1g1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Uci<'a>(pub &'a Move);

impl Uci<'_> {
    /// The origin and destination squares as seen by UCI.
    #[inline(always)]
    pub fn squares(&self) -> (Option<Square>, Square) {
        match *self.0 {
            Move::Castle { king, rook } => {
                let file = if rook > king { File::G } else { File::C };
                (Some(king), Square::from_coords(file, king.rank()))
            }

            ref m => (m.from(), m.to()),
        }
    }
}

impl Display for Uci<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (whence, whither) = self.squares();

        match whence {
            None => write!(f, "{whither}")?,
            Some(wc) => write!(f, "{wc}{whither}")?,
        }

        if let Some(role) = self.0.promotion() {
            write!(f, "{}", role.char())?;
        }

        Ok(())
    }
}

impl PartialEq<str> for Uci<'_> {
    #[inline(always)]
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}
