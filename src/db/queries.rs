// Database queries — SQL for the social_links table.
//
// Every SQLite interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{ClaimOutcome, Platform, RecordCounts, SocialLinkRecord};

/// Raw column values before platform/timestamp parsing.
type RawRow = (String, String, String, String);

const SELECT_COLUMNS: &str =
    "SELECT normalized_link, platform_type, first_seen_at, first_seen_in_token FROM social_links";

/// Timestamps are stored as fixed-width RFC 3339 text (nanoseconds) so they
/// sort lexically and read back exactly as written.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn row_to_record((link, platform, seen_at, token): RawRow) -> Result<SocialLinkRecord> {
    let platform_type: Platform = platform
        .parse()
        .with_context(|| format!("Bad platform_type stored for {link}"))?;
    let first_seen_at = DateTime::parse_from_rfc3339(&seen_at)
        .with_context(|| format!("Bad first_seen_at stored for {link}: {seen_at}"))?
        .with_timezone(&Utc);
    Ok(SocialLinkRecord {
        normalized_link: link,
        platform_type,
        first_seen_at,
        first_seen_in_token: token,
    })
}

// --- Provenance ---

/// Fetch a record by its normalized link.
pub fn lookup_link(conn: &Connection, normalized_link: &str) -> Result<Option<SocialLinkRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE normalized_link = ?1"))?;
    let raw: Option<RawRow> = stmt
        .query_row(params![normalized_link], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })
        .optional()?;
    raw.map(row_to_record).transpose()
}

/// Insert a record unless the link is already claimed.
///
/// The primary key arbitrates: `ON CONFLICT DO NOTHING` either writes the
/// row or leaves the existing one untouched. On conflict the stored winner
/// is read back. Rows are never deleted, so the follow-up read always finds it.
pub fn insert_link_if_absent(conn: &Connection, record: &SocialLinkRecord) -> Result<ClaimOutcome> {
    let changed = conn.execute(
        "INSERT INTO social_links (normalized_link, platform_type, first_seen_at, first_seen_in_token)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(normalized_link) DO NOTHING",
        params![
            record.normalized_link,
            record.platform_type.as_str(),
            format_timestamp(&record.first_seen_at),
            record.first_seen_in_token,
        ],
    )?;

    if changed == 1 {
        return Ok(ClaimOutcome::Inserted);
    }

    match lookup_link(conn, &record.normalized_link)? {
        Some(existing) => Ok(ClaimOutcome::AlreadyExists(existing)),
        None => anyhow::bail!(
            "Insert of {} conflicted but no existing row was found",
            record.normalized_link
        ),
    }
}

/// Every link first claimed by `token_mint`, oldest claim first.
/// Served by `idx_social_links_token`.
pub fn links_for_token(conn: &Connection, token_mint: &str) -> Result<Vec<SocialLinkRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE first_seen_in_token = ?1
         ORDER BY first_seen_at ASC, normalized_link ASC"
    ))?;
    let rows = stmt.query_map(params![token_mint], |row| -> rusqlite::Result<RawRow> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row_to_record(row?)?);
    }
    Ok(records)
}

// --- Admin ---

/// Count claimed links grouped by platform.
pub fn count_by_platform(conn: &Connection) -> Result<RecordCounts> {
    let mut stmt =
        conn.prepare("SELECT platform_type, COUNT(*) FROM social_links GROUP BY platform_type")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = RecordCounts::default();
    for row in rows {
        let (platform, count) = row?;
        let platform: Platform = platform.parse()?;
        counts.add(platform, u64::try_from(count).unwrap_or(0));
    }
    Ok(counts)
}

/// Load every record, oldest claim first.
pub fn all_links(conn: &Connection) -> Result<Vec<SocialLinkRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} ORDER BY first_seen_at ASC, normalized_link ASC"
    ))?;
    let rows = stmt.query_map([], |row| -> rusqlite::Result<RawRow> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row_to_record(row?)?);
    }
    Ok(records)
}
