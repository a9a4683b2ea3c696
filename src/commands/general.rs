//! Version banner, `reload`, `help` and `recipe`.

use log::info;

use crate::host::{LiveEntities, PluginHost};
use crate::logutil::escape_log;

use super::args::{Usage, COMMAND_LABEL};
use super::messages::{self, Replaceable};
use super::permissions::{Actor, Permission};
use super::router::CommandContext;
use super::CommandError;

const HELP_RULE: &str = "&8----------------------------------------------------";

/// `(permission, command, description)` in display order.
const HELP_ENTRIES: [(Permission, &str, &str); 7] = [
    (Permission::Reload, "/lifestealx reload", "reload the config"),
    (Permission::SetLife, "/lifestealx hearts", "modify how many hearts a player has"),
    (
        Permission::GiveItem,
        "/lifestealx giveItem",
        "give other players custom items, such as hearts",
    ),
    (Permission::ViewRecipes, "/lifestealx recipe", "view all recipes"),
    (Permission::Revive, "/revive", "revive a player without a revive item"),
    (Permission::Eliminate, "/eliminate", "eliminate a player"),
    (Permission::Withdraw, "/withdrawheart", "withdraw a heart"),
];

pub fn version_banner(ctx: &CommandContext<'_>) -> String {
    ctx.messages.get(
        messages::VERSION,
        &[Replaceable::new("%version%", ctx.server.version())],
    )
}

pub fn reload(ctx: &mut CommandContext<'_>, actor: &Actor) -> Result<Vec<String>, CommandError> {
    ctx.require(actor, Permission::Reload)?;
    ctx.server
        .reload()
        .map_err(|e| CommandError::Host(e.to_string()))?;
    info!("{} reloaded the plugin", escape_log(actor.name()));
    Ok(vec![ctx.messages.get(messages::RELOAD, &[])])
}

/// One message listing the commands the actor may use.
pub fn help(ctx: &mut CommandContext<'_>, actor: &Actor) -> Result<Vec<String>, CommandError> {
    ctx.require(actor, Permission::Help)?;
    let mut page = format!(
        "<reset><!i><!b> \n{}\n&c&lLifeStealX &7help page<!b>\n{}\n",
        HELP_RULE, HELP_RULE
    );
    for (permission, command, description) in HELP_ENTRIES {
        if ctx.permissions.has_permission(actor, permission) {
            page.push_str(&format!(
                "&c<click:SUGGEST_COMMAND:{cmd}>{cmd}</click> &8- &7{desc}\n",
                cmd = command,
                desc = description
            ));
        }
    }
    page.push_str(HELP_RULE);
    page.push_str("\n<reset><!i><!b> ");
    Ok(vec![ctx.messages.render(false, &page, &[])])
}

/// `recipe <id>` opens the recipe view for the issuing player.
pub fn recipe(
    ctx: &mut CommandContext<'_>,
    actor: &Actor,
    args: &[&str],
) -> Result<Vec<String>, CommandError> {
    ctx.require(actor, Permission::ViewRecipes)?;
    let viewer = *actor.player_id().ok_or(CommandError::PlayersOnly)?;
    let ids = ctx.items.item_ids();
    let known = args.get(1).filter(|id| ids.contains(**id));
    let Some(id) = known else {
        return Err(CommandError::Usage(Usage::Recipe(ids.into_iter().collect())));
    };
    if !ctx.items.is_craftable(id) {
        return Err(CommandError::NotCraftable(id.to_string()));
    }
    ctx.server.show_recipe(&viewer, id);
    info!(
        "{} opened /{} recipe {}",
        escape_log(actor.name()),
        COMMAND_LABEL,
        escape_log(id)
    );
    Ok(Vec::new())
}
