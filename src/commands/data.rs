//! `data <import | export> <file>`
//!
//! File handling belongs to the store; this handler forwards the request and reports.

use log::info;

use crate::logutil::escape_log;
use crate::storage::{self, PlayerStore};

use super::args::{DataArgs, DataOperation};
use super::messages::{self, Replaceable};
use super::permissions::{Actor, Permission};
use super::router::CommandContext;
use super::CommandError;

pub fn run(
    ctx: &mut CommandContext<'_>,
    actor: &Actor,
    args: &[&str],
) -> Result<Vec<String>, CommandError> {
    ctx.require(actor, Permission::ManageData)?;
    let parsed = DataArgs::parse(args)?;
    let failed = |source| CommandError::DataTransfer {
        operation: parsed.operation,
        file: parsed.file_stem.to_string(),
        source,
    };
    // Replies name the file actually read or written.
    let stem = storage::file_stem(parsed.file_stem).map_err(failed)?;
    let file = Replaceable::new("%file%", stem);

    match parsed.operation {
        DataOperation::Export => {
            let path = ctx.store.export(stem).map_err(failed)?;
            info!(
                target: "security",
                "{} exported player data to {}",
                escape_log(actor.name()),
                path.display()
            );
            Ok(vec![ctx.messages.get(messages::EXPORT_DATA, &[file])])
        }
        DataOperation::Import => {
            let rows = ctx.store.import(stem).map_err(failed)?;
            info!(
                target: "security",
                "{} imported {} player records from {}.csv",
                escape_log(actor.name()),
                rows,
                stem
            );
            Ok(vec![ctx.messages.get(messages::IMPORT_DATA, &[file])])
        }
    }
}
