/// A tracked game, one per save folder.
#[derive(Debug, Clone)]
pub struct GameRun {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub snapshot_count: i64,
    pub last_ingested_at: Option<String>,
}

/// One ingested save of a game.
#[derive(Debug, Clone)]
pub struct SnapshotRecord {
    pub id: i64,
    pub game_id: i64,
    pub archive_path: String,
    pub file_size: i64,
    pub last_modified: i64,
    pub content_hash: i64,
    pub ingested_at: String,
}
