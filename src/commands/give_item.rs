//! `giveItem <player> <item> [amount] [silent]`

use log::info;

use crate::host::LiveEntities;
use crate::logutil::escape_log;

use super::args::{GiveItemArgs, Usage};
use super::messages::{self, Replaceable};
use super::permissions::{Actor, Permission};
use super::router::CommandContext;
use super::target::TargetResolver;
use super::CommandError;

pub fn run(
    ctx: &mut CommandContext<'_>,
    actor: &Actor,
    args: &[&str],
) -> Result<Vec<String>, CommandError> {
    ctx.require(actor, Permission::GiveItem)?;
    let parsed = GiveItemArgs::parse(args)?;
    // Inventories only exist for connected players.
    let target = TargetResolver::new(&*ctx.server, ctx.bridge).online(parsed.player)?;

    if !ctx.items.item_ids().contains(parsed.item) {
        return Err(CommandError::Usage(Usage::GiveItem));
    }
    let amount = parsed.amount()?;
    let stack = ctx
        .items
        .create_item(parsed.item, amount)
        .ok_or(CommandError::Usage(Usage::GiveItem))?;
    let display_name = stack.display_name.clone();

    ctx.server.give_item(&target.id, stack);
    if !parsed.silent {
        let notice = ctx.messages.get(
            messages::GIVE_ITEM,
            &[
                Replaceable::new("%amount%", amount),
                Replaceable::new("%item%", &display_name),
            ],
        );
        ctx.server.send_message(&target.id, &notice);
    }

    info!(
        target: "security",
        "{} gave {}x {} to {}{}",
        escape_log(actor.name()),
        amount,
        escape_log(parsed.item),
        escape_log(&target.name),
        if parsed.silent { " (silent)" } else { "" }
    );
    Ok(Vec::new())
}
