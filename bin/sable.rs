use anyhow::Error as Failure;
use clap::{Parser, Subcommand};
use sable::chess::{Color, Position, Uci as UciMove};
use sable::rules::Rules;
use sable::search::{Depth, Engine, HashSize, Limits, Options, QuiescenceDepth};
use sable::uci::{Outbound, Uci, UciParser};
use std::io::{prelude::*, stdin, stdout};
use std::{sync::mpsc, thread, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(Debug, Parser)]
#[clap(name = "Sable", version, author)]
#[clap(help_template = "
{name} v{version} by {author}

{name} is a depth and time bounded alpha-beta chess engine.
Without a subcommand it speaks the UCI protocol on stdin and stdout.
Diagnostics are written to stderr and filtered by RUST_LOG.

{usage-heading} {usage}

{all-args}
")]
struct Cli {
    /// Size of the transposition table in MiB.
    #[arg(long, default_value_t = HashSize::default())]
    hash: HashSize,

    /// How many plies the quiescence search may extend past the horizon.
    #[arg(long, default_value_t = QuiescenceDepth::default())]
    quiescence: QuiescenceDepth,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Searches a single position and prints the best move.
    Bestmove {
        /// The position in FEN, the starting position if omitted.
        #[arg(long)]
        fen: Option<Position>,

        /// The maximum number of plies to search.
        #[arg(long)]
        depth: Option<Depth>,

        /// The time budget in milliseconds.
        #[arg(long)]
        time: Option<u64>,
    },

    /// Scores every legal move one ply deep and lists them best first.
    Rank {
        /// The position in FEN, the starting position if omitted.
        #[arg(long)]
        fen: Option<Position>,
    },

    /// Lets the engine play against itself.
    Selfplay {
        /// The position in FEN, the starting position if omitted.
        #[arg(long)]
        fen: Option<Position>,

        /// The maximum number of plies to search per move.
        #[arg(long)]
        depth: Option<Depth>,

        /// The time budget per move in milliseconds.
        #[arg(long, default_value_t = 1000)]
        time: u64,

        /// The number of moves after which the game is abandoned.
        #[arg(long, default_value_t = 200)]
        max_moves: usize,
    },
}

fn main() -> Result<(), Failure> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let args = Cli::parse();
    let options = Options {
        hash: args.hash,
        quiescence: args.quiescence,
    };

    let mut engine = Engine::with_options(&options);

    match args.action {
        None => uci(engine),

        Some(Action::Bestmove { fen, depth, time }) => {
            let mut pos = fen.unwrap_or_default();
            let limits = Limits {
                depth,
                time: time.map(Duration::from_millis),
                ..Limits::none()
            };

            let mut stdout = stdout().lock();
            let mut failure = Ok(());
            let info = engine.search(&mut pos, &limits, |info| {
                if failure.is_ok() {
                    failure = writeln!(stdout, "{}", Outbound::from(info.clone()));
                }
            });

            failure?;
            let best = info.and_then(|i| i.best().cloned());
            writeln!(stdout, "{}", Outbound::from(best))?;
            Ok(())
        }

        Some(Action::Rank { fen }) => {
            let mut pos = fen.unwrap_or_default();
            let mut stdout = stdout().lock();
            for (m, score) in engine.rank(&mut pos) {
                writeln!(stdout, "{} {score}", UciMove(&m))?;
            }

            Ok(())
        }

        Some(Action::Selfplay {
            fen,
            depth,
            time,
            max_moves,
        }) => {
            let mut pos = fen.unwrap_or_default();
            let limits = Limits {
                depth,
                time: Some(Duration::from_millis(time)),
                ..Limits::none()
            };

            let mut stdout = stdout().lock();
            for _ in 0..max_moves {
                let Some(m) = engine.find_best_move(&mut pos, &limits) else {
                    break;
                };

                writeln!(stdout, "{}", UciMove(&m))?;
                pos.push(m);

                if pos.is_insufficient_material() {
                    break;
                }
            }

            let result = if pos.is_checkmate() {
                match pos.turn() {
                    Color::White => "0-1",
                    Color::Black => "1-0",
                }
            } else if pos.is_stalemate() || pos.is_insufficient_material() {
                "1/2-1/2"
            } else {
                "*"
            };

            info!(fen = %pos, result, "game over");
            writeln!(stdout, "{result}")?;
            Ok(())
        }
    }
}

fn uci(engine: Engine) -> Result<(), Failure> {
    let (tx, rx) = mpsc::channel();
    let mut server = Uci::new(rx.into_iter(), stdout().lock(), engine);
    let relay = server.relay();

    thread::spawn(move || {
        for line in stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };

            match line.trim() {
                "" => continue,
                trimmed => match UciParser.parse(trimmed) {
                    Err(e) => warn!("ignored uci command, {e}"),
                    Ok(cmd) => {
                        relay.observe(&cmd);
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                },
            }
        }
    });

    server.run()?;
    Ok(())
}
