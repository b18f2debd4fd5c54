pub mod del;
pub mod executable;
pub mod get;
pub mod hget;
pub mod hgetall;
pub mod hset;
pub mod ping;
pub mod set;

use bytes::Bytes;
use std::{str, vec};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

use del::Del;
use get::Get;
use hget::HGet;
use hgetall::HGetAll;
use hset::HSet;
use ping::Ping;
use set::Set;

#[derive(Debug, PartialEq)]
pub enum Command {
    Del(Del),
    Get(Get),
    HGet(HGet),
    HGetAll(HGetAll),
    HSet(HSet),
    Ping(Ping),
    Set(Set),
}

impl Command {
    /// Mutating commands change store state and must be recorded in the
    /// append-only file before their mutation is applied.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Command::Set(_) | Command::HSet(_) | Command::Del(_))
    }
}

impl Executable for Command {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        match self {
            Command::Del(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::HGet(cmd) => cmd.exec(store),
            Command::HGetAll(cmd) => cmd.exec(store),
            Command::HSet(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = Error;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Clients send commands to the server as RESP arrays of bulk strings.
        let frames = match frame {
            Frame::Array(array) if !array.is_empty() => array,
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "non-empty array".to_string(),
                    actual: frame,
                }
                .into())
            }
        };

        let parser = &mut CommandParser {
            parts: frames.into_iter(),
        };

        let command_name = parser.parse_command_name()?;

        match &command_name[..] {
            "del" => Del::try_from(parser).map(Command::Del),
            "get" => Get::try_from(parser).map(Command::Get),
            "hget" => HGet::try_from(parser).map(Command::HGet),
            "hgetall" => HGetAll::try_from(parser).map(Command::HGetAll),
            "hset" => HSet::try_from(parser).map(Command::HSet),
            "ping" => Ping::try_from(parser).map(Command::Ping),
            "set" => Set::try_from(parser).map(Command::Set),
            _ => Err(CommandParserError::UnknownCommand {
                command: command_name,
            }
            .into()),
        }
    }
}

pub struct CommandParser {
    parts: vec::IntoIter<Frame>,
}

impl CommandParser {
    fn parse_command_name(&mut self) -> Result<String, CommandParserError> {
        let command_name = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match command_name {
            Frame::Simple(s) => Ok(s.to_lowercase()),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_lowercase())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    /// Fails with the canonical arity error when the number of remaining
    /// arguments is outside `[min, max]`.
    fn check_arity(
        &self,
        command: &str,
        min: usize,
        max: usize,
    ) -> Result<(), CommandParserError> {
        let remaining = self.parts.len();
        if remaining < min || remaining > max {
            return Err(CommandParserError::WrongNumberOfArguments {
                command: command.to_string(),
            });
        }
        Ok(())
    }

    fn next_string(&mut self) -> Result<String, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match frame {
            // Both `Simple` and `Bulk` representation may be strings. Strings are parsed to UTF-8.
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_string())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match frame {
            Frame::Simple(s) => Ok(Bytes::from(s)),
            Frame::Bulk(bytes) => Ok(bytes),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("protocol error; invalid frame, expected {expected}, got {actual}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },
    #[error("wrong number of arguments for '{command}' command")]
    WrongNumberOfArguments { command: String },
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("protocol error; attempting to extract a value failed due to the frame being fully consumed")]
    EndOfStream,
}
