//! Admin command engine for `/lifestealx`.
//!
//! The [`CommandRouter`] receives a whitespace-split argument list and an [`Actor`],
//! checks the subcommand's permission and hands off to one handler:
//!
//! ```text
//! reload | hearts | giveItem | recipe | help | data
//! ```
//!
//! Handlers return `Result<_, CommandError>`; the router turns every error into a
//! single chat line for the actor and marks the invocation as not handled.
//! [`complete`](CommandRouter::complete) offers suggestions for partially typed input.

pub mod args;
pub mod completion;
pub mod data;
pub mod general;
pub mod give_item;
pub mod hearts;
pub mod messages;
pub mod permissions;
pub mod router;
pub mod target;

use thiserror::Error;

use crate::errors::StorageError;

pub use args::{DataOperation, Subcommand, Usage};
pub use completion::Completion;
pub use messages::Messages;
pub use permissions::{Actor, Permission, PermissionGate, PermissionTable};
pub use router::{CommandContext, CommandOutcome, CommandRouter};
pub use target::{ResolvedTarget, TargetResolver};

/// Why a command invocation did not complete.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing permission")]
    PermissionDenied,

    #[error("usage: {0}")]
    Usage(Usage),

    #[error("player not found: {0}")]
    PlayerNotFound(String),

    /// The configured heart ceiling would be exceeded.
    #[error("heart limit of {limit} reached")]
    CeilingReached { limit: i64 },

    #[error("hearts cannot be set to zero or below")]
    InvalidZeroOrNegativeTarget,

    #[error("malformed amount: {0}")]
    MalformedAmount(String),

    #[error("item is not craftable: {0}")]
    NotCraftable(String),

    #[error("only players can use this command")]
    PlayersOnly,

    #[error("storage error: {0}")]
    Persistence(#[from] StorageError),

    #[error("could not {} {file}.csv: {source}", .operation.as_str())]
    DataTransfer {
        operation: DataOperation,
        file: String,
        #[source]
        source: StorageError,
    },

    /// The surrounding server rejected an operation (e.g. reload failed).
    #[error("host error: {0}")]
    Host(String),
}
