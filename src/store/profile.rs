use duckdb::{params, Connection, Result as DbResult};

use crate::store::models::UserProfile;

pub struct ProfileStore;

impl ProfileStore {
    /// The stored profile, or field defaults when nothing was saved yet.
    pub fn get(conn: &Connection) -> DbResult<UserProfile> {
        let mut stmt = conn.prepare(
            "SELECT name, profession, expertise, interests, description,
                    preferred_language, communication_style
             FROM profile WHERE id = 1",
        )?;

        let mut rows = stmt.query_map([], |row| {
            let expertise_str: String = row.get(2)?;
            let interests_str: String = row.get(3)?;

            Ok(UserProfile {
                name: row.get(0)?,
                profession: row.get(1)?,
                expertise: serde_json::from_str(&expertise_str).unwrap_or_default(),
                interests: serde_json::from_str(&interests_str).unwrap_or_default(),
                description: row.get(4)?,
                preferred_language: row.get(5)?,
                communication_style: row.get(6)?,
            })
        })?;

        match rows.next() {
            Some(row) => row,
            None => Ok(UserProfile::default()),
        }
    }

    /// Overwrites the singleton row in place.
    pub fn upsert(conn: &Connection, profile: &UserProfile) -> DbResult<()> {
        let expertise = serde_json::to_string(&profile.expertise)
            .unwrap_or_else(|_| "[]".to_string());
        let interests = serde_json::to_string(&profile.interests)
            .unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "INSERT OR REPLACE INTO profile
                (id, name, profession, expertise, interests, description,
                 preferred_language, communication_style)
             VALUES (1, ?, ?, ?, ?, ?, ?, ?)",
            params![
                profile.name,
                profile.profession,
                expertise,
                interests,
                profile.description,
                profile.preferred_language,
                profile.communication_style
            ],
        )?;
        Ok(())
    }
}
