use crate::chess::{Move, Uci};
use crate::search::{HashSize, Info, Mate, QuiescenceDepth};
use std::fmt::{self, Display, Formatter};

/// A message sent to the GUI.
#[derive(Debug, Clone, Eq, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum Outbound {
    BestMove(Option<Move>),
    ReadyOk,
    Info(Info),
    InfoString(String),
    UciOk,
}

impl From<Option<Move>> for Outbound {
    fn from(m: Option<Move>) -> Self {
        Outbound::BestMove(m)
    }
}

impl From<Info> for Outbound {
    fn from(info: Info) -> Self {
        Outbound::Info(info)
    }
}

impl Display for Outbound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::BestMove(None) => f.write_str("bestmove 0000"),
            Outbound::BestMove(Some(best)) => write!(f, "bestmove {}", Uci(best)),
            Outbound::ReadyOk => f.write_str("readyok"),
            Outbound::InfoString(s) => write!(f, "info string {s}"),

            Outbound::Info(info) => {
                let ms = info.time().as_millis();
                let nps = info.nodes() as u128 * 1000 / ms.max(1);
                let (depth, nodes) = (info.depth(), info.nodes());
                write!(f, "info depth {depth} time {ms} nodes {nodes} nps {nps}")?;

                match info.score().mate() {
                    Mate::None => write!(f, " score cp {}", info.score())?,
                    Mate::Mating(p) => write!(f, " score mate {}", (p + 1) / 2)?,
                    Mate::Mated(p) => write!(f, " score mate -{}", (p + 1) / 2)?,
                }

                if !info.pv().is_empty() {
                    f.write_str(" pv")?;
                    for m in info.pv() {
                        write!(f, " {}", Uci(m))?;
                    }
                }

                Ok(())
            }

            Outbound::UciOk => {
                writeln!(f, "id name Sable {}", env!("CARGO_PKG_VERSION"))?;
                writeln!(f, "id author {}", env!("CARGO_PKG_AUTHORS"))?;

                writeln!(
                    f,
                    "option name Hash type spin default {} min 0 max {}",
                    HashSize::default(),
                    HashSize::MAX
                )?;

                writeln!(
                    f,
                    "option name Quiescence type spin default {} min 0 max {}",
                    QuiescenceDepth::default(),
                    QuiescenceDepth::MAX
                )?;

                f.write_str("uciok")
            }
        }
    }
}
