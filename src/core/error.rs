use thiserror::Error;

use crate::arena::MatchPhase;

#[derive(Error, Debug)]
pub enum RiftError {
    #[error("Match is full or already started")]
    RoomFull,

    #[error("Player not found: {0}")]
    PlayerNotFound(crate::core::types::PlayerId),

    #[error("Seat is empty: {0:?}")]
    SeatEmpty(crate::arena::Seat),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Match actor is gone")]
    ActorClosed,
}

pub type Result<T> = std::result::Result<T, RiftError>;

/// Why a player command was dropped.
///
/// Rejections never reach the client; the command is simply ignored and the
/// reason is only logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("command not allowed in phase {0:?}")]
    WrongPhase(MatchPhase),

    #[error("sender is not seated in this match")]
    NotJoined,

    #[error("unknown or foreign entity: {0}")]
    UnknownEntity(String),

    #[error("capacity reached: {0}")]
    Capacity(&'static str),

    #[error("not enough resources: {0}")]
    Insufficient(&'static str),

    #[error("elements do not form a spell")]
    InvalidCombination,
}

pub type CommandResult = std::result::Result<(), Rejection>;
