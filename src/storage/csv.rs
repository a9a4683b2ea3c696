//! CSV encoding for player data export/import.
//!
//! The column layout matches the files older releases wrote, so a server can
//! migrate by exporting on one backend and importing on another.

use chrono::{DateTime, TimeZone, Utc};

use crate::errors::StorageError;
use crate::types::{PlayerId, PlayerRecord, PLAYER_SCHEMA_VERSION};

pub const HEADER: &str =
    "uuid,name,maxhp,lives,bans,revives,heartsGained,heartsLost,killedOtherPlayers,firstJoin";

const COLUMNS: usize = 10;

/// Render records as CSV text, header first.
pub fn encode_records(records: &[PlayerRecord]) -> String {
    let mut out = String::with_capacity(HEADER.len() + records.len() * 96);
    out.push_str(HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            r.uuid,
            escape_field(&r.name),
            r.max_health,
            r.lives,
            r.ban_count,
            r.revive_count,
            r.hearts_gained,
            r.hearts_lost,
            r.killed_other_players,
            r.first_join.timestamp_millis(),
        ));
    }
    out
}

/// Parse CSV text produced by [`encode_records`]. A missing header is tolerated;
/// blank lines are skipped. Line numbers in errors are 1-based.
pub fn decode_records(content: &str) -> Result<Vec<PlayerRecord>, StorageError> {
    let mut records = Vec::new();
    for (idx, raw) in content.trim_start_matches('\u{feff}').lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if idx == 0 && line.starts_with("uuid,") {
            continue;
        }
        records.push(decode_line(line, line_no)?);
    }
    Ok(records)
}

fn decode_line(line: &str, line_no: usize) -> Result<PlayerRecord, StorageError> {
    let fields = split_fields(line).map_err(|reason| StorageError::MalformedCsv {
        line: line_no,
        reason,
    })?;
    if fields.len() != COLUMNS {
        return Err(StorageError::MalformedCsv {
            line: line_no,
            reason: format!("expected {} columns, found {}", COLUMNS, fields.len()),
        });
    }
    let bad = |column: &str| StorageError::MalformedCsv {
        line: line_no,
        reason: format!("invalid {}", column),
    };

    let uuid: PlayerId = fields[0].parse().map_err(|_| bad("uuid"))?;
    let max_health: f64 = fields[2].trim().parse().map_err(|_| bad("maxhp"))?;
    if !max_health.is_finite() || max_health < 0.0 {
        return Err(bad("maxhp"));
    }
    let int = |i: usize, column: &str| -> Result<i32, StorageError> {
        fields[i].trim().parse::<i32>().map_err(|_| bad(column))
    };
    let millis: i64 = fields[9].trim().parse().map_err(|_| bad("firstJoin"))?;
    let first_join: DateTime<Utc> = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| bad("firstJoin"))?;

    Ok(PlayerRecord {
        schema_version: PLAYER_SCHEMA_VERSION,
        uuid,
        name: fields[1].clone(),
        max_health,
        lives: int(3, "lives")?,
        ban_count: int(4, "bans")?,
        revive_count: int(5, "revives")?,
        hearts_gained: int(6, "heartsGained")?,
        hearts_lost: int(7, "heartsLost")?,
        killed_other_players: int(8, "killedOtherPlayers")?,
        first_join,
    })
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;
    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            }
            ('"', false) if current.is_empty() => quoted = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }
    if quoted {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
