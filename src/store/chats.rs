use chrono::{DateTime, Utc};
use duckdb::{params, Connection, Result as DbResult, Row};
use uuid::Uuid;

use crate::store::models::{Chat, ChatMessage, ChatRole};

/// Title a chat is created with before its first user message names it.
pub const UNTITLED: &str = "New Chat";

const TITLE_MAX_CHARS: usize = 30;

pub struct ChatStore;

impl ChatStore {
    fn row_to_chat(row: &Row) -> DbResult<Chat> {
        // Timestamps are selected CAST AS VARCHAR; DuckDB's native timestamp
        // values are awkward to extract without the chrono driver feature.
        let created_str: String = row.get(2)?;
        let updated_str: String = row.get(3)?;

        Ok(Chat {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            title: row.get(1)?,
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        })
    }

    fn row_to_message(row: &Row) -> DbResult<ChatMessage> {
        let role_str: String = row.get(2)?;
        let created_str: String = row.get(4)?;

        Ok(ChatMessage {
            id: row.get(0)?,
            chat_id: row.get::<_, String>(1)?.parse().unwrap_or_default(),
            role: ChatRole::parse(&role_str).unwrap_or(ChatRole::User),
            content: row.get(3)?,
            created_at: parse_timestamp(&created_str),
        })
    }

    pub fn insert_chat(conn: &Connection, title: &str) -> DbResult<Chat> {
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO chats (id, title) VALUES (?, ?)",
            params![id.to_string(), title],
        )?;

        match Self::get_chat(conn, id)? {
            Some(chat) => Ok(chat),
            None => Err(duckdb::Error::QueryReturnedNoRows),
        }
    }

    pub fn get_chat(conn: &Connection, id: Uuid) -> DbResult<Option<Chat>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)
             FROM chats WHERE id = ?",
        )?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_chat)?;

        if let Some(row) = rows.next() {
            Ok(Some(row?))
        } else {
            Ok(None)
        }
    }

    pub fn list_chats(conn: &Connection, limit: usize, offset: usize) -> DbResult<Vec<Chat>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)
             FROM chats ORDER BY updated_at DESC LIMIT ? OFFSET ?",
        )?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], Self::row_to_chat)?;

        let mut chats = Vec::new();
        for row in rows {
            chats.push(row?);
        }
        Ok(chats)
    }

    pub fn delete_chat(conn: &Connection, id: Uuid) -> DbResult<()> {
        conn.execute("BEGIN TRANSACTION", [])?;

        let id_str = id.to_string();

        if let Err(e) = conn.execute("DELETE FROM messages WHERE chat_id = ?", params![id_str]) {
            let _ = conn.execute("ROLLBACK", []);
            return Err(e);
        }

        if let Err(e) = conn.execute("DELETE FROM chats WHERE id = ?", params![id_str]) {
            let _ = conn.execute("ROLLBACK", []);
            return Err(e);
        }

        conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Appends a message; messages are append-only and never reordered.
    /// The first user message appended while the chat still carries the
    /// placeholder title renames it, once.
    pub fn append_message(
        conn: &Connection,
        chat_id: Uuid,
        role: ChatRole,
        content: &str,
    ) -> DbResult<ChatMessage> {
        conn.execute(
            "INSERT INTO messages (chat_id, role, content) VALUES (?, ?, ?)",
            params![chat_id.to_string(), role.as_str(), content],
        )?;

        conn.execute(
            "UPDATE chats SET updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![chat_id.to_string()],
        )?;

        if role == ChatRole::User {
            conn.execute(
                "UPDATE chats SET title = ? WHERE id = ? AND title = ?",
                params![derive_title(content), chat_id.to_string(), UNTITLED],
            )?;
        }

        // Fetch the message we just inserted (id comes from the sequence)
        let mut stmt = conn.prepare(
            "SELECT id, chat_id, role, content, CAST(created_at AS VARCHAR)
             FROM messages WHERE chat_id = ? ORDER BY id DESC LIMIT 1",
        )?;
        let mut rows = stmt.query_map(params![chat_id.to_string()], Self::row_to_message)?;

        match rows.next() {
            Some(row) => row,
            None => Err(duckdb::Error::QueryReturnedNoRows),
        }
    }

    pub fn get_messages(
        conn: &Connection,
        chat_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> DbResult<Vec<ChatMessage>> {
        let mut stmt = conn.prepare(
            "SELECT id, chat_id, role, content, CAST(created_at AS VARCHAR)
             FROM messages WHERE chat_id = ? ORDER BY id ASC LIMIT ? OFFSET ?",
        )?;

        let rows = stmt.query_map(
            params![chat_id.to_string(), limit as i64, offset as i64],
            Self::row_to_message,
        )?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Plain-text transcript of a chat, used by the export endpoint and CLI.
    pub fn export_transcript(conn: &Connection, chat: &Chat) -> DbResult<String> {
        let messages = Self::get_messages(conn, chat.id, 1000, 0)?;

        let mut export = String::new();
        export.push_str(&format!("Chat: {}\n", chat.title));
        export.push_str(&format!("ID: {}\n", chat.id));
        export.push_str(&format!("Created At: {}\n", chat.created_at));
        export.push_str("---\n");

        for m in messages {
            export.push_str(&format!("[{}]: {}\n", m.role.as_str().to_uppercase(), m.content));
            export.push_str("---\n");
        }

        Ok(export)
    }
}

/// First 30 characters of the message, with a trailing ellipsis when cut.
pub fn derive_title(content: &str) -> String {
    let truncated: String = content.chars().take(TITLE_MAX_CHARS).collect();
    if content.chars().count() > TITLE_MAX_CHARS {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

// DuckDB renders timestamps as "YYYY-MM-DD HH:MM:SS[.ffffff]" with no
// offset; they are stored in UTC.
pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| s.parse::<DateTime<Utc>>())
        .unwrap_or_else(|_| Utc::now())
}
