use super::models::*;
use super::sqlite::Database;
use rusqlite::{params, OptionalExtension, Result, Row};
use tracing::debug;

impl Database {
    // ── Games ────────────────────────────────────────────────────

    pub fn get_or_create_game(&self, name: &str) -> Result<i64> {
        let existing: Option<i64> = self
            .connection()
            .query_row(
                "SELECT id FROM game WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let now = chrono::Utc::now().to_rfc3339();
        self.connection().execute(
            "INSERT INTO game (name, created_at) VALUES (?1, ?2)",
            params![name, now],
        )?;
        let id = self.connection().last_insert_rowid();
        debug!("Created game {} with id {}", name, id);
        Ok(id)
    }

    /// Names of known games starting with `prefix` (case-sensitive), sorted.
    /// An empty prefix matches every game.
    pub fn get_known_runs(&self, prefix: &str) -> Result<Vec<String>> {
        let mut stmt = self.connection().prepare(
            "SELECT name FROM game \
             WHERE substr(name, 1, length(?1)) = ?1 \
             ORDER BY name",
        )?;
        let names = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(names)
    }

    pub fn get_game(&self, name: &str) -> Result<Option<GameRun>> {
        self.connection()
            .query_row(
                "SELECT g.id, g.name, g.created_at, COUNT(s.id), MAX(s.ingested_at) \
                 FROM game g \
                 LEFT JOIN snapshot s ON s.game_id = g.id \
                 WHERE g.name = ?1 \
                 GROUP BY g.id",
                params![name],
                |row| {
                    Ok(GameRun {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                        snapshot_count: row.get(3)?,
                        last_ingested_at: row.get(4)?,
                    })
                },
            )
            .optional()
    }

    // ── Snapshots ────────────────────────────────────────────────

    /// Record a snapshot. Returns `false` if the game already has a snapshot with this hash.
    pub fn insert_snapshot(
        &self,
        game_id: i64,
        archive_path: &str,
        file_size: i64,
        last_modified: i64,
        content_hash: i64,
    ) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let inserted = self.connection().execute(
            "INSERT OR IGNORE INTO snapshot \
             (game_id, archive_path, file_size, last_modified, content_hash, ingested_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![game_id, archive_path, file_size, last_modified, content_hash, now],
        )?;
        Ok(inserted == 1)
    }

    /// Snapshots of a game, oldest save first.
    pub fn list_snapshots(&self, game_id: i64) -> Result<Vec<SnapshotRecord>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, game_id, archive_path, file_size, last_modified, content_hash, ingested_at \
             FROM snapshot WHERE game_id = ?1 \
             ORDER BY last_modified, id",
        )?;
        let snapshots = stmt
            .query_map(params![game_id], snapshot_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(snapshots)
    }

    pub fn snapshot_count(&self, game_id: i64) -> Result<i64> {
        self.connection().query_row(
            "SELECT COUNT(*) FROM snapshot WHERE game_id = ?1",
            params![game_id],
            |row| row.get(0),
        )
    }
}

fn snapshot_from_row(row: &Row<'_>) -> Result<SnapshotRecord> {
    Ok(SnapshotRecord {
        id: row.get(0)?,
        game_id: row.get(1)?,
        archive_path: row.get(2)?,
        file_size: row.get(3)?,
        last_modified: row.get(4)?,
        content_hash: row.get(5)?,
        ingested_at: row.get(6)?,
    })
}
