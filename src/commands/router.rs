use log::{debug, warn};

use crate::config::HeartsConfig;
use crate::host::{GameServer, IdentityBridge, ItemRegistry};
use crate::logutil::{escape_args, escape_log};
use crate::storage::PlayerStore;

use super::args::{Subcommand, COMMAND_LABEL};
use super::completion::{self, Completion};
use super::messages::{self, Messages, Replaceable};
use super::permissions::{Actor, Permission, PermissionGate};
use super::{data, general, give_item, hearts, CommandError};

/// Collaborators for one invocation. Built by the caller, borrowed by every handler.
pub struct CommandContext<'a> {
    pub store: &'a mut dyn PlayerStore,
    pub server: &'a mut dyn GameServer,
    pub items: &'a dyn ItemRegistry,
    pub permissions: &'a dyn PermissionGate,
    /// `None` when the identity bridge is disabled.
    pub bridge: Option<&'a dyn IdentityBridge>,
    pub hearts: HeartsConfig,
    pub messages: &'a Messages,
}

impl CommandContext<'_> {
    pub fn require(&self, actor: &Actor, permission: Permission) -> Result<(), CommandError> {
        if self.permissions.has_permission(actor, permission) {
            Ok(())
        } else {
            Err(CommandError::PermissionDenied)
        }
    }
}

/// Result of one dispatch: whether a handler completed, and the lines for the actor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub handled: bool,
    pub replies: Vec<String>,
}

impl CommandOutcome {
    fn handled(replies: Vec<String>) -> Self {
        Self {
            handled: true,
            replies,
        }
    }

    fn unhandled(replies: Vec<String>) -> Self {
        Self {
            handled: false,
            replies,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRouter;

impl CommandRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch<S: AsRef<str>>(
        &self,
        ctx: &mut CommandContext<'_>,
        actor: &Actor,
        args: &[S],
    ) -> CommandOutcome {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        debug!(
            "{} issued /{} {}",
            escape_log(actor.name()),
            COMMAND_LABEL,
            escape_args(&args)
        );

        let Some(first) = args.first() else {
            return CommandOutcome::unhandled(vec![general::version_banner(ctx)]);
        };
        let Some(subcommand) = Subcommand::parse(first) else {
            return CommandOutcome::unhandled(Vec::new());
        };

        let result = match subcommand {
            Subcommand::Reload => general::reload(ctx, actor),
            Subcommand::Help => general::help(ctx, actor),
            Subcommand::Recipe => general::recipe(ctx, actor, &args),
            Subcommand::Hearts => hearts::run(ctx, actor, &args),
            Subcommand::GiveItem => give_item::run(ctx, actor, &args),
            Subcommand::Data => data::run(ctx, actor, &args),
        };

        match result {
            Ok(replies) => CommandOutcome::handled(replies),
            Err(err) => {
                match &err {
                    CommandError::Persistence(_)
                    | CommandError::DataTransfer { .. }
                    | CommandError::Host(_) => {
                        warn!(
                            "/{} {} by {} failed: {}",
                            COMMAND_LABEL,
                            subcommand.as_str(),
                            escape_log(actor.name()),
                            err
                        )
                    }
                    _ => debug!("/{} {} rejected: {}", COMMAND_LABEL, subcommand.as_str(), err),
                }
                CommandOutcome::unhandled(vec![error_message(ctx.messages, &err)])
            }
        }
    }

    /// Suggestions for the last token of a partially typed invocation.
    pub fn complete<S: AsRef<str>>(
        &self,
        ctx: &CommandContext<'_>,
        actor: &Actor,
        args: &[S],
    ) -> Completion {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        completion::complete(ctx, actor, &args)
    }
}

/// The single chat line an error turns into.
pub fn error_message(catalogue: &Messages, err: &CommandError) -> String {
    match err {
        CommandError::PermissionDenied => catalogue.get(messages::NO_PERMISSION, &[]),
        CommandError::Usage(usage) => catalogue.get(
            messages::USAGE_ERROR,
            &[Replaceable::new("%usage%", usage)],
        ),
        CommandError::PlayerNotFound(name) => catalogue.get(
            messages::PLAYER_NOT_FOUND,
            &[Replaceable::new("%player%", name)],
        ),
        CommandError::CeilingReached { limit } => catalogue.get(
            messages::MAX_HEARTS_REACHED,
            &[Replaceable::new("%limit%", limit)],
        ),
        CommandError::InvalidZeroOrNegativeTarget => {
            catalogue.get(messages::HEARTS_NOT_ABOVE_ZERO, &[])
        }
        CommandError::NotCraftable(_) => catalogue.get(messages::RECIPE_NOT_CRAFTABLE, &[]),
        CommandError::PlayersOnly => catalogue.get(messages::PLAYERS_ONLY, &[]),
        CommandError::Persistence(_) => catalogue.get(messages::STORAGE_ERROR, &[]),
        CommandError::DataTransfer {
            operation,
            file,
            source,
        } => catalogue.get(
            messages::DATA_TRANSFER_FAILED,
            &[
                Replaceable::new("%option%", operation.as_str()),
                Replaceable::new("%file%", file),
                Replaceable::new("%reason%", source),
            ],
        ),
        CommandError::Host(reason) => catalogue.get(
            messages::RELOAD_FAILED,
            &[Replaceable::new("%reason%", reason)],
        ),
        CommandError::MalformedAmount(_) => catalogue.get(messages::GENERIC_ERROR, &[]),
    }
}
