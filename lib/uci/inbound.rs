use crate::chess::{Color, Position};
use crate::rules::Rules;
use crate::search::{Depth, HashSize, Limits, QuiescenceDepth};
use crate::util::parsers::*;
use derive_more::with_trait::{Display, Error, From};
use nom::error::Error as ParseError;
use nom::{branch::*, bytes::complete::*, combinator::*, sequence::*, *};
use std::str::FromStr;
use std::time::Duration;

/// A command sent by the GUI.
#[derive(Debug, Clone, Eq, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum Inbound {
    Position(Position),
    Go {
        depth: Option<Depth>,
        nodes: Option<u64>,
        time: Option<Duration>,
        wtime: Option<Duration>,
        btime: Option<Duration>,
        winc: Option<Duration>,
        binc: Option<Duration>,
    },
    SetOptionHash(HashSize),
    SetOptionQuiescence(QuiescenceDepth),
    IsReady,
    UciNewGame,
    Uci,
    Stop,
    Quit,
    Eval,
    Rank,
}

impl Inbound {
    /// A `go` without limits.
    pub fn go_infinite() -> Self {
        Self::Go {
            depth: None,
            nodes: None,
            time: None,
            wtime: None,
            btime: None,
            winc: None,
            binc: None,
        }
    }

    /// The search [`Limits`] of a `go` command for the side to move.
    ///
    /// Only the clock of the side to move counts, and a missing increment is zero.
    pub fn limits(&self, turn: Color) -> Option<Limits> {
        let Inbound::Go {
            depth,
            nodes,
            time,
            wtime,
            btime,
            winc,
            binc,
        } = *self
        else {
            return None;
        };

        let (remaining, increment) = match turn {
            Color::White => (wtime, winc),
            Color::Black => (btime, binc),
        };

        Some(Limits {
            depth,
            nodes,
            time,
            clock: remaining.map(|t| (t, increment.unwrap_or_default())),
        })
    }
}

/// The reason why parsing a UCI command failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseUciError<'s> {
    #[display("unrecognized sequence `{}`", _0.input)]
    Unrecognized(#[error(not(source))] ParseError<&'s str>),
    #[display("illegal move `{_0}`")]
    IllegalMove(#[error(not(source))] &'s str),
}

/// A stateless parser for [`Inbound`] commands.
#[derive(Debug, Default, Copy, Clone)]
pub struct UciParser;

impl UciParser {
    /// Parses a single line.
    pub fn parse<'s>(&self, s: &'s str) -> Result<Inbound, ParseUciError<'s>> {
        let mut cmd = t(alt((
            tag("position"),
            tag("go"),
            tag("setoption"),
            tag("isready"),
            tag("ucinewgame"),
            tag("uci"),
            tag("stop"),
            tag("quit"),
            tag("eval"),
            tag("rank"),
        )));

        match cmd.parse(s).finish()? {
            (args, "position") => {
                let word6 = (word, t(word), t(word), t(word), t(word), word);
                let fen = field("fen", t(recognize(word6))).map_res(Position::from_str);
                let startpos = t(tag("startpos")).map(|_| Position::default());
                let moves = opt(field("moves", rest));

                let mut position = terminated((alt((startpos, fen)), moves), eof);
                let (_, (mut pos, moves)) = position.parse(args).finish()?;

                for s in moves.unwrap_or_default().split_ascii_whitespace() {
                    let Some(m) = pos.parse_move(s) else {
                        return Err(ParseUciError::IllegalMove(s));
                    };

                    pos.push(m);
                }

                Ok(Inbound::Position(pos))
            }

            (args, "go") => {
                let wtime = field("wtime", millis);
                let winc = field("winc", millis);
                let btime = field("btime", millis);
                let binc = field("binc", millis);
                let time = field("movetime", millis);
                let nodes = field("nodes", int);
                let depth = field("depth", int);
                let inf = t(tag("infinite"));

                let params = gather((wtime, winc, btime, binc, time, nodes, depth, inf));
                let mut go = terminated(opt(params), eof).map(Option::unwrap_or_default);
                let (_, (wtime, winc, btime, binc, time, nodes, depth, inf)) =
                    go.parse(args).finish()?;

                match inf {
                    Some(_) => Ok(Inbound::go_infinite()),
                    None => Ok(Inbound::Go {
                        depth,
                        nodes,
                        time,
                        wtime,
                        btime,
                        winc,
                        binc,
                    }),
                }
            }

            (args, "setoption") => {
                let option = |n| preceded((t(tag("name")), tag_no_case(n), t(tag("value"))), rest);

                let options = alt((
                    option("hash")
                        .map_res(HashSize::from_str)
                        .map(Inbound::SetOptionHash),
                    option("quiescence")
                        .map_res(QuiescenceDepth::from_str)
                        .map(Inbound::SetOptionQuiescence),
                ));

                let mut setoption = terminated(options, eof);
                let (_, uci) = setoption.parse(args).finish()?;
                Ok(uci)
            }

            ("", "isready") => Ok(Inbound::IsReady),
            ("", "ucinewgame") => Ok(Inbound::UciNewGame),
            ("", "uci") => Ok(Inbound::Uci),
            ("", "stop") => Ok(Inbound::Stop),
            ("", "quit") => Ok(Inbound::Quit),
            ("", "eval") => Ok(Inbound::Eval),
            ("", "rank") => Ok(Inbound::Rank),

            (args, _) => Err(ParseUciError::Unrecognized(ParseError::new(
                args,
                nom::error::ErrorKind::Eof,
            ))),
        }
    }
}
