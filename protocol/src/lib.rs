//! Requests and replies exchanged between a board host and its players.
//!
//! Requests arrive either as JSON objects tagged by `"op"` or as
//! whitespace-separated text commands:
//!
//! ```text
//! look PLAYER
//! flip PLAYER ROW COL
//! replace PLAYER FROM TO
//! watch PLAYER
//! spectate
//! ```

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scramble_core::{BoardView, CardView, FlipReport};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Look {
        player: String,
    },
    /// Coordinates are 1-based and deliberately wider than any board, so
    /// out-of-range values reach the board as rejected flips.
    Flip {
        player: String,
        row: i64,
        col: i64,
    },
    /// Replaces every unmatched card whose value is `from` with `to`.
    Replace {
        player: String,
        from: String,
        to: String,
    },
    Watch {
        player: String,
    },
    Spectate,
}

impl Request {
    pub fn from_json(line: &str) -> Result<Self, RequestError> {
        serde_json::from_str(line).map_err(|err| RequestError::Json(err.to_string()))
    }

    pub fn player(&self) -> Option<&str> {
        use Request::*;
        match self {
            Look { player } | Flip { player, .. } | Replace { player, .. } | Watch { player } => {
                Some(player.as_str())
            }
            Spectate => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected} argument(s)")]
    WrongArity {
        command: &'static str,
        expected: usize,
    },
    #[error("`{0}` is not a valid coordinate")]
    InvalidCoord(String),
    #[error("malformed request: {0}")]
    Json(String),
}

impl FromStr for Request {
    type Err = RequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(RequestError::Empty)?;
        let args: Vec<&str> = words.collect();

        let arity = |command: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(RequestError::WrongArity { command, expected })
            }
        };

        Ok(match command {
            "look" => {
                arity("look", 1)?;
                Request::Look {
                    player: args[0].to_owned(),
                }
            }
            "flip" => {
                arity("flip", 3)?;
                Request::Flip {
                    player: args[0].to_owned(),
                    row: parse_coord(args[1])?,
                    col: parse_coord(args[2])?,
                }
            }
            "replace" => {
                arity("replace", 3)?;
                Request::Replace {
                    player: args[0].to_owned(),
                    from: args[1].to_owned(),
                    to: args[2].to_owned(),
                }
            }
            "watch" => {
                arity("watch", 1)?;
                Request::Watch {
                    player: args[0].to_owned(),
                }
            }
            "spectate" => {
                arity("spectate", 0)?;
                Request::Spectate
            }
            other => return Err(RequestError::UnknownCommand(other.to_owned())),
        })
    }
}

fn parse_coord(text: &str) -> Result<i64, RequestError> {
    text.parse()
        .map_err(|_| RequestError::InvalidCoord(text.to_owned()))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    Board {
        rows: Vec<Vec<CardView>>,
    },
    Flip {
        success: bool,
        message: String,
        rows: Vec<Vec<CardView>>,
    },
    /// Acknowledges a watch; the matching `changed` reply follows later.
    Watching {
        player: String,
    },
    /// A watched board changed, as seen by `player`.
    Changed {
        player: String,
        rows: Vec<Vec<CardView>>,
    },
    Error {
        message: String,
    },
}

impl Reply {
    pub fn error(err: impl core::fmt::Display) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }

    pub fn changed(player: &str, view: &BoardView) -> Self {
        Self::Changed {
            player: player.to_owned(),
            rows: view.rows(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| error_json(&err.to_string()))
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "reply": "error", "message": message }).to_string()
}

impl From<&BoardView> for Reply {
    fn from(view: &BoardView) -> Self {
        Self::Board { rows: view.rows() }
    }
}

impl From<&FlipReport> for Reply {
    fn from(report: &FlipReport) -> Self {
        Self::Flip {
            success: report.success(),
            message: report.message().to_owned(),
            rows: report.board.rows(),
        }
    }
}
