//! Token-level parsing: which subcommand, which operation, and the typed arguments
//! each handler expects. Every rejection here is a [`CommandError::Usage`] carrying
//! the exact syntax for that handler.

use std::fmt;

use super::permissions::Permission;
use super::CommandError;

/// Root command label shown in usage strings.
pub const COMMAND_LABEL: &str = "lifestealx";

/// Amount suggestions offered for `hearts` and `giveItem`.
pub const AMOUNT_SUGGESTIONS: [&str; 3] = ["1", "32", "64"];

pub const SILENT_FLAG: &str = "silent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Reload,
    Hearts,
    GiveItem,
    Recipe,
    Help,
    Data,
}

impl Subcommand {
    /// In the order completion suggests them.
    pub const ALL: [Subcommand; 6] = [
        Subcommand::Reload,
        Subcommand::Hearts,
        Subcommand::GiveItem,
        Subcommand::Recipe,
        Subcommand::Help,
        Subcommand::Data,
    ];

    /// Tokens are matched exactly; `GIVEITEM` is not `giveItem`.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sub| sub.as_str() == token)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Subcommand::Reload => "reload",
            Subcommand::Hearts => "hearts",
            Subcommand::GiveItem => "giveItem",
            Subcommand::Recipe => "recipe",
            Subcommand::Help => "help",
            Subcommand::Data => "data",
        }
    }

    pub fn permission(self) -> Permission {
        match self {
            Subcommand::Reload => Permission::Reload,
            Subcommand::Hearts => Permission::SetLife,
            Subcommand::GiveItem => Permission::GiveItem,
            Subcommand::Recipe => Permission::ViewRecipes,
            Subcommand::Help => Permission::Help,
            Subcommand::Data => Permission::ManageData,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartsOperation {
    Add,
    Set,
    Remove,
    Get,
}

impl HeartsOperation {
    pub const ALL: [HeartsOperation; 4] = [
        HeartsOperation::Add,
        HeartsOperation::Set,
        HeartsOperation::Remove,
        HeartsOperation::Get,
    ];

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeartsOperation::Add => "add",
            HeartsOperation::Set => "set",
            HeartsOperation::Remove => "remove",
            HeartsOperation::Get => "get",
        }
    }

    pub fn takes_amount(self) -> bool {
        !matches!(self, HeartsOperation::Get)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOperation {
    Export,
    Import,
}

impl DataOperation {
    pub const ALL: [DataOperation; 2] = [DataOperation::Export, DataOperation::Import];

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataOperation::Export => "export",
            DataOperation::Import => "import",
        }
    }
}

/// Which usage line to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Usage {
    Hearts,
    GiveItem,
    Data,
    /// Lists every known recipe identifier
    Recipe(Vec<String>),
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Usage::Hearts => write!(
                f,
                "/{} hearts <add | set | remove> <player> [amount]",
                COMMAND_LABEL
            ),
            Usage::GiveItem => write!(f, "/{} giveItem <player> <item> [amount]", COMMAND_LABEL),
            Usage::Data => write!(f, "/{} data <import | export> <file>", COMMAND_LABEL),
            Usage::Recipe(ids) => write!(f, "/{} recipe <{}>", COMMAND_LABEL, ids.join(" | ")),
        }
    }
}

/// Parse a non-negative whole number. Tokens that are not integers at all (or do not
/// fit in 32 bits) are [`CommandError::MalformedAmount`]; negative integers are a usage
/// error for the given handler.
pub fn parse_amount(token: &str, usage: Usage) -> Result<i32, CommandError> {
    let value: i32 = token
        .parse()
        .map_err(|_| CommandError::MalformedAmount(token.to_string()))?;
    if value < 0 {
        return Err(CommandError::Usage(usage));
    }
    Ok(value)
}

/// `hearts <op> <player> [amount]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartsArgs<'a> {
    pub operation: HeartsOperation,
    pub player: &'a str,
    amount: Option<&'a str>,
}

impl<'a> HeartsArgs<'a> {
    pub fn parse(args: &[&'a str]) -> Result<Self, CommandError> {
        if args.len() < 3 {
            return Err(CommandError::Usage(Usage::Hearts));
        }
        let operation = HeartsOperation::parse(args[1]).ok_or(CommandError::Usage(Usage::Hearts))?;
        Ok(Self {
            operation,
            player: args[2],
            amount: args.get(3).copied(),
        })
    }

    /// The amount token, required for every operation except `get`.
    pub fn amount(&self) -> Result<i32, CommandError> {
        let token = self.amount.ok_or(CommandError::Usage(Usage::Hearts))?;
        parse_amount(token, Usage::Hearts)
    }
}

/// `giveItem <player> <item> [amount] [silent]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveItemArgs<'a> {
    pub player: &'a str,
    pub item: &'a str,
    amount: Option<&'a str>,
    pub silent: bool,
}

impl<'a> GiveItemArgs<'a> {
    pub fn parse(args: &[&'a str]) -> Result<Self, CommandError> {
        if args.len() < 3 {
            return Err(CommandError::Usage(Usage::GiveItem));
        }
        Ok(Self {
            player: args[1],
            item: args[2],
            amount: args.get(3).copied(),
            silent: args.get(4).is_some_and(|flag| *flag == SILENT_FLAG),
        })
    }

    /// Item count, defaulting to 1; zero is rejected.
    pub fn amount(&self) -> Result<u32, CommandError> {
        let Some(token) = self.amount else {
            return Ok(1);
        };
        let value = parse_amount(token, Usage::GiveItem)?;
        if value < 1 {
            return Err(CommandError::Usage(Usage::GiveItem));
        }
        Ok(value as u32)
    }
}

/// `data <import|export> <file>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataArgs<'a> {
    pub operation: DataOperation,
    pub file_stem: &'a str,
}

impl<'a> DataArgs<'a> {
    pub fn parse(args: &[&'a str]) -> Result<Self, CommandError> {
        if args.len() < 3 {
            return Err(CommandError::Usage(Usage::Data));
        }
        let operation = DataOperation::parse(args[1]).ok_or(CommandError::Usage(Usage::Data))?;
        Ok(Self {
            operation,
            file_stem: args[2],
        })
    }
}
