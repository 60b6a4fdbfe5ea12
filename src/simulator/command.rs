use std::str::FromStr;

use thiserror::Error;

/// A line typed into the `miner` client.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mine,
    Boost(f64),
    Withdraw,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("`boost` needs a numeric level, e.g. `boost 2`")]
    MissingLevel,
    #[error("`{0}` is not a number")]
    BadLevel(String),
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
}

pub const HELP: &str = "commands: mine | boost <level> | withdraw | status | help | quit";

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        match head.to_ascii_lowercase().as_str() {
            "mine" | "m" => Ok(Command::Mine),
            "boost" | "b" => {
                let level = words.next().ok_or(ParseCommandError::MissingLevel)?;
                level
                    .parse::<f64>()
                    .map(Command::Boost)
                    .map_err(|_| ParseCommandError::BadLevel(level.to_string()))
            }
            "withdraw" | "w" => Ok(Command::Withdraw),
            "status" | "s" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}
