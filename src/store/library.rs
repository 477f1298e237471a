//! Prompt, rule and role collections. All three follow the same shape:
//! seeded built-ins carry is_default = TRUE and refuse updates and deletes;
//! user-created entries get uuid identifiers and are fully mutable.

use duckdb::{params, Connection, Result as DbResult, Row};
use uuid::Uuid;

use crate::store::chats::parse_timestamp;
use crate::store::models::{Prompt, PromptCategory, Role, RoleCategory, Rule};
use crate::store::WriteOutcome;

pub struct PromptStore;

impl PromptStore {
    fn row_to_prompt(row: &Row) -> DbResult<Prompt> {
        let category_str: String = row.get(4)?;
        let rule_ids_str: String = row.get(5)?;
        let created_str: String = row.get(7)?;

        Ok(Prompt {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            content: row.get(3)?,
            category: PromptCategory::parse(&category_str).unwrap_or(PromptCategory::General),
            rule_ids: serde_json::from_str(&rule_ids_str).unwrap_or_default(),
            is_default: row.get(6)?,
            created_at: parse_timestamp(&created_str),
        })
    }

    const SELECT: &'static str = "SELECT id, title, description, content, category, rule_ids, \
                                  is_default, CAST(created_at AS VARCHAR) FROM prompts";

    pub fn insert(
        conn: &Connection,
        title: &str,
        description: &str,
        content: &str,
        category: PromptCategory,
        rule_ids: &[String],
    ) -> DbResult<Prompt> {
        let id = Uuid::new_v4().to_string();
        let rule_ids_str = serde_json::to_string(rule_ids).unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "INSERT INTO prompts (id, title, description, content, category, rule_ids, is_default)
             VALUES (?, ?, ?, ?, ?, ?, FALSE)",
            params![id, title, description, content, category.as_str(), rule_ids_str],
        )?;

        match Self::get(conn, &id)? {
            Some(prompt) => Ok(prompt),
            None => Err(duckdb::Error::QueryReturnedNoRows),
        }
    }

    pub fn get(conn: &Connection, id: &str) -> DbResult<Option<Prompt>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?", Self::SELECT))?;
        let mut rows = stmt.query_map(params![id], Self::row_to_prompt)?;

        if let Some(row) = rows.next() {
            Ok(Some(row?))
        } else {
            Ok(None)
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Prompt>> {
        let mut stmt =
            conn.prepare(&format!("{} ORDER BY is_default DESC, created_at ASC", Self::SELECT))?;
        let rows = stmt.query_map([], Self::row_to_prompt)?;

        let mut prompts = Vec::new();
        for row in rows {
            prompts.push(row?);
        }
        Ok(prompts)
    }

    /// User-created prompts only; built-ins are excluded from export.
    pub fn export(conn: &Connection) -> DbResult<Vec<Prompt>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE is_default = FALSE ORDER BY created_at ASC",
            Self::SELECT
        ))?;
        let rows = stmt.query_map([], Self::row_to_prompt)?;

        let mut prompts = Vec::new();
        for row in rows {
            prompts.push(row?);
        }
        Ok(prompts)
    }

    pub fn update(
        conn: &Connection,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
        content: Option<&str>,
        category: Option<PromptCategory>,
        rule_ids: Option<&[String]>,
    ) -> DbResult<WriteOutcome> {
        let existing = match Self::get(conn, id)? {
            Some(p) => p,
            None => return Ok(WriteOutcome::NotFound),
        };
        if existing.is_default {
            return Ok(WriteOutcome::Protected);
        }

        let rule_ids_str = serde_json::to_string(rule_ids.unwrap_or(&existing.rule_ids))
            .unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "UPDATE prompts SET title = ?, description = ?, content = ?, category = ?, rule_ids = ?
             WHERE id = ?",
            params![
                title.unwrap_or(&existing.title),
                description.unwrap_or(&existing.description),
                content.unwrap_or(&existing.content),
                category.unwrap_or(existing.category).as_str(),
                rule_ids_str,
                id
            ],
        )?;
        Ok(WriteOutcome::Applied)
    }

    pub fn delete(conn: &Connection, id: &str) -> DbResult<WriteOutcome> {
        delete_guarded(conn, "prompts", id)
    }
}

pub struct RuleStore;

impl RuleStore {
    fn row_to_rule(row: &Row) -> DbResult<Rule> {
        let created_str: String = row.get(5)?;

        Ok(Rule {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            content: row.get(3)?,
            is_default: row.get(4)?,
            created_at: parse_timestamp(&created_str),
        })
    }

    const SELECT: &'static str = "SELECT id, name, description, content, is_default, \
                                  CAST(created_at AS VARCHAR) FROM rules";

    pub fn insert(
        conn: &Connection,
        name: &str,
        description: &str,
        content: &str,
    ) -> DbResult<Rule> {
        let id = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO rules (id, name, description, content, is_default)
             VALUES (?, ?, ?, ?, FALSE)",
            params![id, name, description, content],
        )?;

        match Self::get(conn, &id)? {
            Some(rule) => Ok(rule),
            None => Err(duckdb::Error::QueryReturnedNoRows),
        }
    }

    pub fn get(conn: &Connection, id: &str) -> DbResult<Option<Rule>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?", Self::SELECT))?;
        let mut rows = stmt.query_map(params![id], Self::row_to_rule)?;

        if let Some(row) = rows.next() {
            Ok(Some(row?))
        } else {
            Ok(None)
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Rule>> {
        let mut stmt =
            conn.prepare(&format!("{} ORDER BY is_default DESC, created_at ASC", Self::SELECT))?;
        let rows = stmt.query_map([], Self::row_to_rule)?;

        let mut rules = Vec::new();
        for row in rows {
            rules.push(row?);
        }
        Ok(rules)
    }

    pub fn update(
        conn: &Connection,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
        content: Option<&str>,
    ) -> DbResult<WriteOutcome> {
        let existing = match Self::get(conn, id)? {
            Some(r) => r,
            None => return Ok(WriteOutcome::NotFound),
        };
        if existing.is_default {
            return Ok(WriteOutcome::Protected);
        }

        conn.execute(
            "UPDATE rules SET name = ?, description = ?, content = ? WHERE id = ?",
            params![
                name.unwrap_or(&existing.name),
                description.unwrap_or(&existing.description),
                content.unwrap_or(&existing.content),
                id
            ],
        )?;
        Ok(WriteOutcome::Applied)
    }

    pub fn delete(conn: &Connection, id: &str) -> DbResult<WriteOutcome> {
        delete_guarded(conn, "rules", id)
    }
}

pub struct RoleStore;

impl RoleStore {
    fn row_to_role(row: &Row) -> DbResult<Role> {
        let category_str: String = row.get(4)?;
        let expertise_str: String = row.get(5)?;
        let created_str: String = row.get(7)?;

        Ok(Role {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            content: row.get(3)?,
            category: RoleCategory::parse(&category_str).unwrap_or(RoleCategory::Other),
            expertise: serde_json::from_str(&expertise_str).unwrap_or_default(),
            is_default: row.get(6)?,
            created_at: parse_timestamp(&created_str),
        })
    }

    const SELECT: &'static str = "SELECT id, name, description, content, category, expertise, \
                                  is_default, CAST(created_at AS VARCHAR) FROM roles";

    pub fn insert(
        conn: &Connection,
        name: &str,
        description: &str,
        content: &str,
        category: RoleCategory,
        expertise: &[String],
    ) -> DbResult<Role> {
        let id = Uuid::new_v4().to_string();
        let expertise_str = serde_json::to_string(expertise).unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "INSERT INTO roles (id, name, description, content, category, expertise, is_default)
             VALUES (?, ?, ?, ?, ?, ?, FALSE)",
            params![id, name, description, content, category.as_str(), expertise_str],
        )?;

        match Self::get(conn, &id)? {
            Some(role) => Ok(role),
            None => Err(duckdb::Error::QueryReturnedNoRows),
        }
    }

    pub fn get(conn: &Connection, id: &str) -> DbResult<Option<Role>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?", Self::SELECT))?;
        let mut rows = stmt.query_map(params![id], Self::row_to_role)?;

        if let Some(row) = rows.next() {
            Ok(Some(row?))
        } else {
            Ok(None)
        }
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Role>> {
        let mut stmt =
            conn.prepare(&format!("{} ORDER BY is_default DESC, created_at ASC", Self::SELECT))?;
        let rows = stmt.query_map([], Self::row_to_role)?;

        let mut roles = Vec::new();
        for row in rows {
            roles.push(row?);
        }
        Ok(roles)
    }

    pub fn update(
        conn: &Connection,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
        content: Option<&str>,
        category: Option<RoleCategory>,
        expertise: Option<&[String]>,
    ) -> DbResult<WriteOutcome> {
        let existing = match Self::get(conn, id)? {
            Some(r) => r,
            None => return Ok(WriteOutcome::NotFound),
        };
        if existing.is_default {
            return Ok(WriteOutcome::Protected);
        }

        let expertise_str = serde_json::to_string(expertise.unwrap_or(&existing.expertise))
            .unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "UPDATE roles SET name = ?, description = ?, content = ?, category = ?, expertise = ?
             WHERE id = ?",
            params![
                name.unwrap_or(&existing.name),
                description.unwrap_or(&existing.description),
                content.unwrap_or(&existing.content),
                category.unwrap_or(existing.category).as_str(),
                expertise_str,
                id
            ],
        )?;
        Ok(WriteOutcome::Applied)
    }

    pub fn delete(conn: &Connection, id: &str) -> DbResult<WriteOutcome> {
        delete_guarded(conn, "roles", id)
    }
}

/// Delete refusing to touch default-flagged rows. The table name is one of
/// our own constants, never caller input.
fn delete_guarded(conn: &Connection, table: &str, id: &str) -> DbResult<WriteOutcome> {
    let mut stmt = conn.prepare(&format!("SELECT is_default FROM {} WHERE id = ?", table))?;
    let mut rows = stmt.query_map(params![id], |row| row.get::<_, bool>(0))?;

    let is_default = match rows.next() {
        Some(row) => row?,
        None => return Ok(WriteOutcome::NotFound),
    };
    if is_default {
        return Ok(WriteOutcome::Protected);
    }

    conn.execute(&format!("DELETE FROM {} WHERE id = ?", table), params![id])?;
    Ok(WriteOutcome::Applied)
}
