//! Tab completion mirroring the router's table.
//!
//! The position is the index of the token being typed. Position 0 only offers
//! subcommands the actor may run; later positions return nothing for subcommands the
//! actor could not run either. Player-name positions return [`Completion::PlayerNames`]
//! so the host can fill in connected names itself.

use crate::storage::PlayerStore;

use super::args::{HeartsOperation, Subcommand, AMOUNT_SUGGESTIONS, SILENT_FLAG};
use super::permissions::Actor;
use super::router::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Options(Vec<String>),
    /// Suggest the names of connected players.
    PlayerNames,
}

impl Completion {
    fn none() -> Self {
        Completion::Options(Vec::new())
    }

    /// Resolve [`Completion::PlayerNames`] against a list of connected names.
    pub fn into_suggestions(self, online_names: Vec<String>, typed: &str) -> Vec<String> {
        match self {
            Completion::Options(options) => options,
            Completion::PlayerNames => filter_prefix(online_names, typed),
        }
    }
}

pub fn complete(ctx: &CommandContext<'_>, actor: &Actor, args: &[&str]) -> Completion {
    let position = args.len().saturating_sub(1);
    let typed = args.last().copied().unwrap_or("");

    if position == 0 {
        let allowed = Subcommand::ALL
            .into_iter()
            .filter(|sub| ctx.permissions.has_permission(actor, sub.permission()))
            .map(|sub| sub.as_str().to_string());
        return options(allowed, typed);
    }

    let Some(subcommand) = Subcommand::parse(args[0]) else {
        return Completion::none();
    };
    if !ctx.permissions.has_permission(actor, subcommand.permission()) {
        return Completion::none();
    }

    match (subcommand, position) {
        (Subcommand::Hearts, 1) => options(
            HeartsOperation::ALL.into_iter().map(|op| op.as_str().to_string()),
            typed,
        ),
        (Subcommand::Hearts, 2) => Completion::PlayerNames,
        (Subcommand::Hearts, 3) => match HeartsOperation::parse(args[1]) {
            Some(op) if op.takes_amount() => amounts(typed),
            _ => Completion::none(),
        },
        (Subcommand::GiveItem, 1) => Completion::PlayerNames,
        (Subcommand::GiveItem, 2) | (Subcommand::Recipe, 1) => {
            options(ctx.items.item_ids(), typed)
        }
        (Subcommand::GiveItem, 3) => amounts(typed),
        (Subcommand::GiveItem, 4) => options([SILENT_FLAG.to_string()], typed),
        (Subcommand::Data, 1) => options(["import".to_string(), "export".to_string()], typed),
        (Subcommand::Data, 2) if args[1] == "import" => {
            options(ctx.store.import_candidates(), typed)
        }
        _ => Completion::none(),
    }
}

fn amounts(typed: &str) -> Completion {
    options(AMOUNT_SUGGESTIONS.iter().map(|a| a.to_string()), typed)
}

fn options(candidates: impl IntoIterator<Item = String>, typed: &str) -> Completion {
    Completion::Options(filter_prefix(candidates, typed))
}

fn filter_prefix(candidates: impl IntoIterator<Item = String>, typed: &str) -> Vec<String> {
    let typed = typed.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&typed))
        .collect()
}
