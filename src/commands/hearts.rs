//! `hearts <add | set | remove | get> <player> [amount]`
//!
//! Mutations run validate, persist, apply-to-live-player, confirm. A failed save
//! returns before the connected player is touched, so the stored record stays the
//! source of truth.

use log::info;

use crate::config::HeartsConfig;
use crate::host::LiveEntities;
use crate::logutil::escape_log;
use crate::storage::PlayerStore;

use super::args::{HeartsArgs, HeartsOperation};
use super::messages::{self, Replaceable};
use super::permissions::{Actor, Permission};
use super::router::CommandContext;
use super::target::TargetResolver;
use super::CommandError;

/// A validated change to a player's maximum health.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartsChange {
    pub max_health: f64,
    /// Hearts reported back: the resulting total for add/remove, the requested one for set.
    pub reported: i64,
}

/// Check `amount` against the rules for `operation` and compute the new maximum health.
/// `get` is not a mutation and yields `None`.
pub fn plan(
    operation: HeartsOperation,
    max_health: f64,
    amount: i32,
    config: HeartsConfig,
) -> Result<Option<HeartsChange>, CommandError> {
    let amount = i64::from(amount);
    let ceiling = CommandError::CeilingReached {
        limit: config.max_hearts,
    };
    let change = match operation {
        HeartsOperation::Get => return Ok(None),
        HeartsOperation::Add => {
            // Both sides in f64: `max_hearts * 2` may not fit in i64.
            if config.enforce_max_hearts
                && max_health + (amount * 2) as f64 > config.max_hearts as f64 * 2.0
            {
                return Err(ceiling);
            }
            let max_health = max_health + (amount * 2) as f64;
            HeartsChange {
                max_health,
                reported: (max_health / 2.0) as i64,
            }
        }
        HeartsOperation::Set => {
            if amount == 0 {
                return Err(CommandError::InvalidZeroOrNegativeTarget);
            }
            if config.enforce_max_hearts && amount > config.max_hearts {
                return Err(ceiling);
            }
            HeartsChange {
                max_health: (amount * 2) as f64,
                reported: amount,
            }
        }
        HeartsOperation::Remove => {
            let current = (max_health / 2.0) as i64;
            if current - amount <= 0 {
                return Err(CommandError::InvalidZeroOrNegativeTarget);
            }
            let max_health = max_health - (amount * 2) as f64;
            HeartsChange {
                max_health,
                reported: (max_health / 2.0) as i64,
            }
        }
    };
    Ok(Some(change))
}

pub fn run(
    ctx: &mut CommandContext<'_>,
    actor: &Actor,
    args: &[&str],
) -> Result<Vec<String>, CommandError> {
    ctx.require(actor, Permission::SetLife)?;
    let parsed = HeartsArgs::parse(args)?;
    let target =
        TargetResolver::new(&*ctx.server, ctx.bridge).resolve(&*ctx.store, parsed.player)?;

    if parsed.operation == HeartsOperation::Get {
        return Ok(vec![ctx.messages.get(
            messages::GET_HEARTS,
            &[
                Replaceable::new("%player%", &target.name),
                Replaceable::new("%amount%", target.record.hearts()),
            ],
        )]);
    }

    let amount = parsed.amount()?;
    let planned = plan(parsed.operation, target.record.max_health, amount, ctx.hearts)?;
    let Some(change) = planned else {
        return Ok(Vec::new());
    };

    let mut record = target.record;
    let previous = record.hearts();
    record.max_health = change.max_health;
    ctx.store.save(&record)?;
    ctx.server.apply_max_health(&target.id, change.max_health);

    info!(
        target: "security",
        "{} {} {} hearts for {} ({}): {} -> {}",
        escape_log(actor.name()),
        parsed.operation.as_str(),
        amount,
        escape_log(&target.name),
        target.id,
        previous,
        record.hearts()
    );

    Ok(vec![ctx.messages.get(
        messages::SET_HEARTS_CONFIRM,
        &[
            Replaceable::new("%option%", parsed.operation.as_str()),
            Replaceable::new("%player%", &target.name),
            Replaceable::new("%amount%", change.reported),
        ],
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: HeartsConfig = HeartsConfig {
        enforce_max_hearts: false,
        max_hearts: 20,
    };
    const CAPPED: HeartsConfig = HeartsConfig {
        enforce_max_hearts: true,
        max_hearts: 10,
    };

    fn mutate(
        op: HeartsOperation,
        max_health: f64,
        amount: i32,
        config: HeartsConfig,
    ) -> HeartsChange {
        plan(op, max_health, amount, config).unwrap().unwrap()
    }

    #[test]
    fn add_and_remove_report_resulting_total() {
        let added = mutate(HeartsOperation::Add, 20.0, 5, OPEN);
        assert_eq!(added.max_health, 30.0);
        assert_eq!(added.reported, 15);
        let removed = mutate(HeartsOperation::Remove, 30.0, 5, OPEN);
        assert_eq!(removed.max_health, 20.0);
        assert_eq!(removed.reported, 10);
    }

    #[test]
    fn set_reports_requested_and_rejects_zero() {
        assert_eq!(mutate(HeartsOperation::Set, 20.0, 7, OPEN).reported, 7);
        assert!(matches!(
            plan(HeartsOperation::Set, 20.0, 0, OPEN),
            Err(CommandError::InvalidZeroOrNegativeTarget)
        ));
    }

    #[test]
    fn ceiling_applies_only_when_enforced() {
        assert!(matches!(
            plan(HeartsOperation::Set, 20.0, 11, CAPPED),
            Err(CommandError::CeilingReached { limit: 10 })
        ));
        assert_eq!(mutate(HeartsOperation::Set, 20.0, 10, CAPPED).max_health, 20.0);
        assert!(matches!(
            plan(HeartsOperation::Add, 18.0, 2, CAPPED),
            Err(CommandError::CeilingReached { .. })
        ));
        assert_eq!(mutate(HeartsOperation::Add, 18.0, 1, CAPPED).reported, 10);
        assert_eq!(mutate(HeartsOperation::Set, 20.0, 500, OPEN).reported, 500);
    }

    #[test]
    fn huge_ceiling_does_not_overflow() {
        let huge = HeartsConfig {
            enforce_max_hearts: true,
            max_hearts: i64::MAX,
        };
        assert_eq!(mutate(HeartsOperation::Add, 20.0, 1, huge).reported, 11);
        let set = mutate(HeartsOperation::Set, 20.0, i32::MAX, huge);
        assert_eq!(set.reported, i64::from(i32::MAX));
    }

    #[test]
    fn remove_never_reaches_zero() {
        for amount in [10, 11, 100] {
            assert!(matches!(
                plan(HeartsOperation::Remove, 20.0, amount, OPEN),
                Err(CommandError::InvalidZeroOrNegativeTarget)
            ));
        }
        assert_eq!(mutate(HeartsOperation::Remove, 20.0, 9, OPEN).reported, 1);
        // 10.5 hearts truncate to 10
        assert!(plan(HeartsOperation::Remove, 21.0, 10, OPEN).is_err());
    }

    #[test]
    fn get_is_not_a_mutation() {
        assert_eq!(plan(HeartsOperation::Get, 20.0, 0, CAPPED).unwrap(), None);
    }
}
