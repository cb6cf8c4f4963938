//! Preferences storage
//!
//! A small SQLite key/value table holding the theme and the last deck the
//! user opened. Session state and scores are never written here.

use crate::models::Theme;
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::path::Path;

const THEME_KEY: &str = "theme";
const LAST_DECK_KEY: &str = "last_deck";

/// Opens (or creates) the preferences database at `path`
pub fn init_database(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_tables(&conn)?;
    Ok(conn)
}

/// In-memory database, for tests and as a fallback when the file can't be opened
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

fn get_value(key: &str, conn: &Connection) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM app_state WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

fn set_value(key: &str, value: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Stored theme, light when unset or unrecognised
pub fn get_theme(conn: &Connection) -> Result<Theme> {
    Ok(get_value(THEME_KEY, conn)?
        .and_then(|v| v.parse().ok())
        .unwrap_or_default())
}

pub fn set_theme(theme: Theme, conn: &Connection) -> Result<()> {
    set_value(THEME_KEY, theme.as_str(), conn)?;
    tracing::debug!(theme = theme.as_str(), "theme saved");
    Ok(())
}

/// Location of the deck last opened through the file dialog
pub fn get_last_deck(conn: &Connection) -> Result<Option<String>> {
    get_value(LAST_DECK_KEY, conn)
}

pub fn set_last_deck(location: &str, conn: &Connection) -> Result<()> {
    set_value(LAST_DECK_KEY, location, conn)
}
