//! Chat message templates.
//!
//! Every user-facing line has a key, a built-in fallback template and a flag saying
//! whether the configured prefix goes in front. Server owners replace templates
//! through `[messages.overrides]`. Placeholders look like `%player%`.

use std::collections::HashMap;

use crate::config::MessagesConfig;

/// One message in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageKey {
    pub key: &'static str,
    pub fallback: &'static str,
    pub prefixed: bool,
}

const fn msg(key: &'static str, fallback: &'static str, prefixed: bool) -> MessageKey {
    MessageKey {
        key,
        fallback,
        prefixed,
    }
}

pub const VERSION: MessageKey = msg(
    "messages.versionMsg",
    "&7You are using version %version%",
    true,
);
pub const RELOAD: MessageKey = msg(
    "messages.reloadMsg",
    "&7Successfully reloaded the plugin!",
    true,
);
pub const RELOAD_FAILED: MessageKey = msg(
    "messages.reloadFailed",
    "&cReload failed: %reason%",
    true,
);
pub const NO_PERMISSION: MessageKey = msg(
    "messages.noPermissionError",
    "&cYou don't have permission to use this!",
    false,
);
pub const USAGE_ERROR: MessageKey = msg("messages.usageError", "&cUsage: %usage%", false);
pub const PLAYER_NOT_FOUND: MessageKey =
    msg("messages.playerNotFound", "&cPlayer not found!", false);
pub const PLAYERS_ONLY: MessageKey = msg(
    "messages.playersOnly",
    "&cOnly players can use this command!",
    false,
);
pub const GET_HEARTS: MessageKey = msg(
    "messages.getHearts",
    "&c%player% &7currently has &c%amount% &7hearts!",
    true,
);
pub const SET_HEARTS_CONFIRM: MessageKey = msg(
    "messages.setHeartsConfirm",
    "&7You successfully %option% &c%player%' hearts to &7%amount% hearts!",
    true,
);
pub const MAX_HEARTS_REACHED: MessageKey = msg(
    "messages.maxHeartLimitReached",
    "&cYou already reached the limit of %limit% hearts!",
    true,
);
pub const HEARTS_NOT_ABOVE_ZERO: MessageKey = msg(
    "messages.heartsBelowZero",
    "&cYou cannot set the lives below or to zero",
    false,
);
pub const RECIPE_NOT_CRAFTABLE: MessageKey = msg(
    "messages.recipeNotCraftable",
    "&cThis item is not craftable!",
    false,
);
pub const GIVE_ITEM: MessageKey = msg(
    "messages.giveItem",
    "&7You received &c%amount% &7%item%!",
    true,
);
pub const EXPORT_DATA: MessageKey = msg(
    "messages.exportData",
    "&7Successfully exported player data to &c%file%.csv",
    true,
);
pub const IMPORT_DATA: MessageKey = msg(
    "messages.importData",
    concat!(
        "&7Successfully imported &c%file%.csv&7!\n",
        "&cPlease restart the server, to ensure flawless migration!"
    ),
    true,
);
pub const DATA_TRANSFER_FAILED: MessageKey = msg(
    "messages.dataTransferFailed",
    "&cCould not %option% &c%file%.csv&c: %reason%",
    false,
);
pub const STORAGE_ERROR: MessageKey = msg(
    "messages.storageError",
    "&cCould not save player data, nothing was changed.",
    false,
);
pub const GENERIC_ERROR: MessageKey = msg(
    "messages.commandError",
    "&cAn internal error occurred while attempting to perform this command",
    false,
);

/// A placeholder and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaceable {
    pub placeholder: &'static str,
    pub value: String,
}

impl Replaceable {
    pub fn new(placeholder: &'static str, value: impl ToString) -> Self {
        Self {
            placeholder,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Messages {
    prefix: String,
    overrides: HashMap<String, String>,
}

impl Messages {
    pub fn new(config: &MessagesConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            overrides: config.overrides.clone(),
        }
    }

    /// Render a catalogued message with its placeholders filled in.
    pub fn get(&self, message: MessageKey, replacements: &[Replaceable]) -> String {
        let template = self
            .overrides
            .get(message.key)
            .map(String::as_str)
            .unwrap_or(message.fallback);
        self.render(message.prefixed, template, replacements)
    }

    /// Render raw text through the same placeholder and prefix rules.
    ///
    /// Placeholders are filled in one pass over the template, so a value that itself
    /// contains `%placeholder%` text is inserted verbatim.
    pub fn render(&self, prefixed: bool, template: &str, replacements: &[Replaceable]) -> String {
        let mut text = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(c) = rest.chars().next() {
            let hit = replacements
                .iter()
                .find(|r| !r.placeholder.is_empty() && rest.starts_with(r.placeholder));
            match hit {
                Some(r) => {
                    text.push_str(&r.value);
                    rest = &rest[r.placeholder.len()..];
                }
                None => {
                    text.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        if prefixed {
            format!("{}{}", self.prefix, text)
        } else {
            text
        }
    }
}

/// Remove `&x`/`§x` colour codes and `<tag>` markup for plain-text output (console, logs).
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' | '§' => match chars.peek() {
                Some(code) if code.is_ascii_hexdigit() || "klmnorKLMNOR".contains(*code) => {
                    chars.next();
                }
                _ => out.push(c),
            },
            '<' => {
                let rest: String = chars
                    .clone()
                    .take_while(|ch| *ch != '>' && *ch != '<')
                    .collect();
                let closed = chars.clone().nth(rest.chars().count()) == Some('>');
                if closed && is_markup_tag(&rest) {
                    for _ in 0..=rest.chars().count() {
                        chars.next();
                    }
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn is_markup_tag(tag: &str) -> bool {
    let name = tag.strip_prefix('/').unwrap_or(tag);
    matches!(name, "reset" | "!i" | "!b" | "i" | "b" | "u" | "click") || name.starts_with("click:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> Messages {
        Messages::new(&MessagesConfig {
            prefix: "[LS] ".to_string(),
            overrides: HashMap::new(),
        })
    }

    #[test]
    fn fills_placeholders_and_prefix() {
        let text = messages().get(
            GET_HEARTS,
            &[Replaceable::new("%player%", "Steve"), Replaceable::new("%amount%", 15)],
        );
        assert_eq!(text, "[LS] &cSteve &7currently has &c15 &7hearts!");
        assert_eq!(
            messages().get(PLAYER_NOT_FOUND, &[]),
            "&cPlayer not found!"
        );
    }

    #[test]
    fn placeholder_text_in_values_is_not_expanded() {
        let line = messages().get(
            DATA_TRANSFER_FAILED,
            &[
                Replaceable::new("%option%", "import"),
                Replaceable::new("%file%", "%reason%"),
                Replaceable::new("%reason%", "not found"),
            ],
        );
        assert_eq!(line, "&cCould not import &c%reason%.csv&c: not found");
    }

    #[test]
    fn overrides_replace_fallbacks() {
        let mut overrides = HashMap::new();
        overrides.insert("messages.playerNotFound".to_string(), "Who is %player%?".to_string());
        let messages = Messages::new(&MessagesConfig {
            prefix: String::new(),
            overrides,
        });
        assert_eq!(
            messages.get(PLAYER_NOT_FOUND, &[Replaceable::new("%player%", "Bob")]),
            "Who is Bob?"
        );
    }

    #[test]
    fn strips_colour_codes_and_tags() {
        assert_eq!(strip_formatting("&cRed &7grey §aok"), "Red grey ok");
        assert_eq!(
            strip_formatting("<reset>&c<click:SUGGEST_COMMAND:/x hearts>/x hearts</click> &8- &7d"),
            "/x hearts - d"
        );
        assert_eq!(strip_formatting("a & b < c"), "a & b < c");
        assert_eq!(strip_formatting("<player> [amount]"), "<player> [amount]");
    }
}
