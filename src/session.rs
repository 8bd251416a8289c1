// 🔑 Session Context Store
// The client's only local state: who is logged in and which family
// profile they own. Populated at auth-callback time, cleared at logout
// or when the backend rejects the session cookie.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const KEY_IS_AUTHENTICATED: &str = "isAuthenticated";
pub const KEY_USER: &str = "user";
pub const KEY_FAMILY_PROFILE_ID: &str = "familyProfileId";

// ============================================================================
// AUTH USER
// ============================================================================

/// User object returned by GET /api/auth/user and stored verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// True until the household has completed profile intake
    #[serde(default)]
    pub is_new_user: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_profile_id: Option<i64>,
}

// ============================================================================
// SESSION STORE
// ============================================================================

/// Single-file key/value store for the session context.
///
/// The `familyProfileId` is kept under its own key in addition to the
/// serialized user object because it is the handle every data fetch
/// starts from.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open (and initialize if needed) the store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open session store: {:?}", path.as_ref()))?;
        Self::setup(&conn)?;
        Ok(SessionStore { conn })
    }

    /// In-memory store; used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::setup(&conn)?;
        Ok(SessionStore { conn })
    }

    fn setup(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(())
    }

    // ========================================================================
    // RAW KEY/VALUE ACCESS
    // ========================================================================

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM session WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Drop every stored key. Used at logout and on authentication
    /// failure so no stale session data survives.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM session", [])?;
        Ok(())
    }

    // ========================================================================
    // TYPED ACCESSORS
    // ========================================================================

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.get(KEY_IS_AUTHENTICATED)?.as_deref() == Some("true"))
    }

    pub fn user(&self) -> Result<Option<AuthUser>> {
        match self.get(KEY_USER)? {
            Some(json) => {
                let user =
                    serde_json::from_str(&json).context("Stored user object is unreadable")?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub fn family_profile_id(&self) -> Result<Option<i64>> {
        match self.get(KEY_FAMILY_PROFILE_ID)? {
            Some(raw) => {
                let id = raw
                    .parse::<i64>()
                    .context("Stored familyProfileId is not an integer")?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    pub fn set_family_profile_id(&self, id: i64) -> Result<()> {
        self.set(KEY_FAMILY_PROFILE_ID, &id.to_string())
    }

    /// Record a completed login: the flag, the whole user object, and
    /// the profile id separately when the backend already knows it.
    pub fn store_login(&self, user: &AuthUser) -> Result<()> {
        self.set(KEY_IS_AUTHENTICATED, "true")?;
        self.set(KEY_USER, &serde_json::to_string(user)?)?;

        if let Some(profile_id) = user.family_profile_id {
            self.set_family_profile_id(profile_id)?;
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
