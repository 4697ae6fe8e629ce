mod inbound;
mod outbound;

pub use inbound::*;
pub use outbound::*;

use crate::chess::{Position, Uci as UciMove};
use crate::eval::Evaluator;
use crate::search::{Engine, Stopper};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use tracing::debug;

/// Forwards `stop` from the thread reading commands to the search it was meant for.
///
/// Every `go` is numbered as it is read, and a `stop` applies to every `go` read before it.
#[derive(Debug, Clone)]
pub struct Relay {
    stopper: Stopper,
    issued: Arc<AtomicU64>,
    stopped: Arc<AtomicU64>,
}

impl Relay {
    fn new(stopper: Stopper) -> Self {
        Relay {
            stopper,
            issued: Arc::default(),
            stopped: Arc::default(),
        }
    }

    /// Takes note of a command as soon as it is read, before it is queued.
    pub fn observe(&self, inbound: &Inbound) {
        match inbound {
            Inbound::Go { .. } => {
                self.issued.fetch_add(1, SeqCst);
            }

            Inbound::Stop | Inbound::Quit => {
                self.stopped.store(self.issued.load(SeqCst), SeqCst);
                self.stopper.stop();
            }

            _ => {}
        }
    }

    /// Prepares the stopper for the `go` numbered `n`.
    fn arm(&self, n: u64) {
        self.stopper.reset();
        if self.stopped.load(SeqCst) >= n {
            self.stopper.stop();
        }
    }
}

/// A basic UCI server.
///
/// Commands are handled strictly in order and a `go` blocks until the search
/// concludes. A `stop` can only cut a search short through the [`Relay`],
/// which must observe every command as soon as it is read.
#[derive(Debug)]
pub struct Uci<I, O> {
    input: I,
    output: O,
    engine: Engine,
    pos: Position,
    relay: Relay,
    started: u64,
}

impl<I, O> Uci<I, O> {
    /// Constructs a new uci server instance.
    pub fn new(input: I, output: O, engine: Engine) -> Self {
        Self {
            input,
            output,
            relay: Relay::new(engine.stopper()),
            engine,
            pos: Position::default(),
            started: 0,
        }
    }

    /// A handle for the thread reading commands.
    pub fn relay(&self) -> Relay {
        self.relay.clone()
    }
}

impl<I, O> Uci<I, O>
where
    I: Iterator<Item = Inbound>,
    O: Write,
{
    fn send(&mut self, o: impl Into<Outbound>) -> io::Result<()> {
        writeln!(self.output, "{}", o.into())?;
        self.output.flush()
    }

    /// Runs the UCI server until `quit` or the end of the input.
    pub fn run(&mut self) -> io::Result<()> {
        while let Some(inbound) = self.input.next() {
            debug!(?inbound, "received");

            match inbound {
                Inbound::Position(pos) => self.pos = pos,

                Inbound::UciNewGame => {
                    self.pos = Position::default();
                    self.engine.reset();
                }

                ref go @ Inbound::Go { .. } => {
                    let limits = go.limits(self.pos.turn()).unwrap_or_default();
                    self.started += 1;
                    self.relay.arm(self.started);

                    let (output, engine) = (&mut self.output, &mut self.engine);
                    let mut failure = Ok(());

                    let info = engine.search(&mut self.pos, &limits, |info| {
                        if failure.is_ok() {
                            failure = writeln!(output, "{}", Outbound::from(info.clone()));
                        }
                    });

                    failure?;
                    self.send(info.and_then(|i| i.best().cloned()))?;
                }

                Inbound::SetOptionHash(hash) => self.engine.set_hash(hash),
                Inbound::SetOptionQuiescence(depth) => self.engine.set_quiescence(depth),
                Inbound::IsReady => self.send(Outbound::ReadyOk)?,
                Inbound::Uci => self.send(Outbound::UciOk)?,
                Inbound::Stop => {}
                Inbound::Quit => break,

                Inbound::Eval => {
                    let value = self.engine.evaluator().evaluate(&self.pos);
                    self.send(Outbound::InfoString(format!("static evaluation {value}")))?;
                }

                Inbound::Rank => {
                    for (m, score) in self.engine.rank(&mut self.pos) {
                        let line = format!("{} {score}", UciMove(&m));
                        self.send(Outbound::InfoString(line))?;
                    }
                }
            }
        }

        Ok(())
    }
}
