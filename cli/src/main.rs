use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use scramble_core::{Board, BoardDefinition, BoardView, FlipReport};
use scramble_protocol::{Reply, Request, RequestError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Board definition file
    board: PathBuf,

    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a shuffle seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Read JSON requests and write JSON replies, one per line
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let text = std::fs::read_to_string(&args.board)
        .with_context(|| format!("could not read {}", args.board.display()))?;
    let definition: BoardDefinition = text
        .parse()
        .with_context(|| format!("could not parse {}", args.board.display()))?;

    let mut config = definition.config();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    log::debug!("seed: {:?}", config.seed);
    let board = Board::from_definition(definition, config.dealer()).context("could not build board")?;

    let mut session = Session::new(board, args.json);
    let mut out = io::stdout().lock();
    for line in io::stdin().lock().lines() {
        let line = line.context("could not read command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        session.handle(line, &mut out)?;
        out.flush()?;
    }

    log::info!("session ended with {} watch(es) pending", session.pending.len());
    Ok(())
}

enum Response {
    View(BoardView),
    Flip(FlipReport),
    Error(String),
    Watching(String),
    Changed(String, BoardView),
}

/// One host session: a board plus the watches players are still waiting on.
struct Session {
    board: Board,
    json: bool,
    pending: Vec<(String, LocalBoxFuture<'static, Option<BoardView>>)>,
}

impl Session {
    fn new(board: Board, json: bool) -> Self {
        Self {
            board,
            json,
            pending: Vec::new(),
        }
    }

    fn handle(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let request = if self.json {
            Request::from_json(line)
        } else {
            line.parse::<Request>()
        };

        let response = match request {
            Ok(request) => self.dispatch(request)?,
            Err(err) => err.into(),
        };
        self.write(&response, out)?;

        for (player, view) in self.take_resolved_watches() {
            match view {
                Some(view) => self.write(&Response::Changed(player, view), out)?,
                None => log::warn!("watch for {player} ended without a change"),
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, request: Request) -> anyhow::Result<Response> {
        log::trace!("request: {request:?}");
        Ok(match request {
            Request::Look { player } => Response::View(self.board.look(&player)),
            Request::Spectate => Response::View(self.board.spectate()),
            Request::Flip { player, row, col } => Response::Flip(
                self.board
                    .flip(&player, row, col)
                    .context("board is no longer usable")?,
            ),
            Request::Replace { player, from, to } => {
                Response::View(self.board.map_values(&player, |value| {
                    if value == from {
                        to.clone()
                    } else {
                        value.to_owned()
                    }
                }))
            }
            Request::Watch { player } => {
                let watch = self.board.watch(&player).boxed_local();
                self.pending.push((player.clone(), watch));
                Response::Watching(player)
            }
        })
    }

    fn take_resolved_watches(&mut self) -> Vec<(String, Option<BoardView>)> {
        let mut resolved = Vec::new();
        self.pending.retain_mut(|(player, watch)| match watch.now_or_never() {
            Some(view) => {
                resolved.push((player.clone(), view));
                false
            }
            None => true,
        });
        resolved
    }

    fn write(&self, response: &Response, out: &mut impl Write) -> io::Result<()> {
        if self.json {
            let reply = match response {
                Response::View(view) => Reply::from(view),
                Response::Flip(report) => Reply::from(report),
                Response::Error(message) => Reply::error(message),
                Response::Watching(player) => Reply::Watching {
                    player: player.clone(),
                },
                Response::Changed(player, view) => Reply::changed(player, view),
            };
            return writeln!(out, "{}", reply.to_json());
        }

        match response {
            Response::View(view) => write!(out, "{view}"),
            Response::Flip(report) => write!(out, "{}\n{}", report.message(), report.board),
            Response::Error(message) => writeln!(out, "error: {message}"),
            Response::Watching(player) => writeln!(out, "watching for {player}"),
            Response::Changed(player, view) => write!(out, "changed for {player}:\n{view}"),
        }
    }
}

impl From<RequestError> for Response {
    fn from(err: RequestError) -> Self {
        Self::Error(err.to_string())
    }
}
