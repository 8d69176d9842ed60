//! Activity Timeline
//!
//! Persistent, append-only record of what a learner did: profile saves,
//! track exploration, roadmap generation, task toggles and quiz attempts.

use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, Duration, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqlResult, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

// ============================================================
// MEMORY EVENT TYPES
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryEventType {
    ProfileSaved,
    TrackExplored,
    RoadmapGenerated,
    RoadmapRefreshed,
    TaskToggled,
    QuizStarted,
    AssessmentCompleted,
}

impl MemoryEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryEventType::ProfileSaved => "profile_saved",
            MemoryEventType::TrackExplored => "track_explored",
            MemoryEventType::RoadmapGenerated => "roadmap_generated",
            MemoryEventType::RoadmapRefreshed => "roadmap_refreshed",
            MemoryEventType::TaskToggled => "task_toggled",
            MemoryEventType::QuizStarted => "quiz_started",
            MemoryEventType::AssessmentCompleted => "assessment_completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profile_saved" => Some(MemoryEventType::ProfileSaved),
            "track_explored" => Some(MemoryEventType::TrackExplored),
            "roadmap_generated" => Some(MemoryEventType::RoadmapGenerated),
            "roadmap_refreshed" => Some(MemoryEventType::RoadmapRefreshed),
            "task_toggled" => Some(MemoryEventType::TaskToggled),
            "quiz_started" => Some(MemoryEventType::QuizStarted),
            "assessment_completed" => Some(MemoryEventType::AssessmentCompleted),
            _ => None,
        }
    }
}

// ============================================================
// MEMORY EVENT
// ============================================================

/// A single entry in a learner's timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEvent {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: MemoryEventType,
    pub description: String,
    /// Optional structured metadata (JSON)
    pub metadata: Option<serde_json::Value>,
}

impl MemoryEvent {
    pub fn new(
        user_id: &str,
        event_type: MemoryEventType,
        description: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            timestamp,
            event_type,
            description: description.to_string(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ============================================================
// CAREER MEMORY
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerMemory {
    pub user_id: String,
    pub timeline: Vec<MemoryEvent>,
}

impl CareerMemory {
    /// Events from the `days` days before `now`
    pub fn events_since(&self, days: i64, now: DateTime<Utc>) -> Vec<&MemoryEvent> {
        let cutoff = now - Duration::days(days);
        self.timeline
            .iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }

    pub fn events_of_type(&self, event_type: MemoryEventType) -> Vec<&MemoryEvent> {
        self.timeline
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }
}

// ============================================================
// MEMORY STORE (SQLite-backed)
// ============================================================

pub struct MemoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl MemoryStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Create an in-memory store for testing
    pub fn in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS memory_events (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                description TEXT NOT NULL,
                metadata TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_memory_user_id ON memory_events(user_id)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    pub fn record_event(&self, event: &MemoryEvent) -> StoreResult<()> {
        let conn = self.conn()?;
        let metadata_json = event.metadata.as_ref().map(|m| m.to_string());

        conn.execute(
            "INSERT INTO memory_events (id, user_id, timestamp, event_type, description, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.id,
                event.user_id,
                event.timestamp.to_rfc3339(),
                event.event_type.as_str(),
                event.description,
                metadata_json,
            ],
        )?;

        Ok(())
    }

    /// All events for a user, oldest first
    pub fn get_user_memory(&self, user_id: &str) -> StoreResult<CareerMemory> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, timestamp, event_type, description, metadata
             FROM memory_events
             WHERE user_id = ?1
             ORDER BY timestamp ASC, seq ASC",
        )?;

        let timeline = stmt
            .query_map([user_id], event_from_row)?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(CareerMemory {
            user_id: user_id.to_string(),
            timeline,
        })
    }
}

fn event_from_row(row: &Row<'_>) -> SqlResult<MemoryEvent> {
    let timestamp_str: String = row.get(2)?;
    let event_type_str: String = row.get(3)?;
    let metadata_str: Option<String> = row.get(5)?;

    let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let event_type = MemoryEventType::parse(&event_type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown event type '{}'", event_type_str).into(),
        )
    })?;
    let metadata = metadata_str
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(MemoryEvent {
        id: row.get(0)?,
        user_id: row.get(1)?,
        timestamp,
        event_type,
        description: row.get(4)?,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::in_memory().unwrap();
        let user_id = "test_user";
        let t0 = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();

        store
            .record_event(&MemoryEvent::new(user_id, MemoryEventType::ProfileSaved, "Saved profile", t0))
            .unwrap();
        store
            .record_event(
                &MemoryEvent::new(
                    user_id,
                    MemoryEventType::RoadmapGenerated,
                    "Generated roadmap",
                    t0 + Duration::hours(1),
                )
                .with_metadata(serde_json::json!({"weeks": 12})),
            )
            .unwrap();
        store
            .record_event(&MemoryEvent::new("someone_else", MemoryEventType::TaskToggled, "x", t0))
            .unwrap();
        store
            .record_event(&MemoryEvent::new(
                user_id,
                MemoryEventType::TaskToggled,
                "Completed task",
                t0 + Duration::days(10),
            ))
            .unwrap();

        let memory = store.get_user_memory(user_id).unwrap();
        assert_eq!(memory.timeline.len(), 3);
        assert_eq!(memory.timeline[0].event_type, MemoryEventType::ProfileSaved);
        assert_eq!(memory.timeline[1].event_type, MemoryEventType::RoadmapGenerated);
        assert_eq!(memory.timeline[1].metadata, Some(serde_json::json!({"weeks": 12})));
        assert_eq!(memory.timeline[2].event_type, MemoryEventType::TaskToggled);
        assert_eq!(memory.timeline[0].timestamp, t0);

        let recent = memory.events_since(5, t0 + Duration::days(11));
        assert_eq!(recent.len(), 1);
        assert_eq!(memory.events_of_type(MemoryEventType::ProfileSaved).len(), 1);
    }

    #[test]
    fn test_poisoned_lock_is_a_store_error() {
        let store = MemoryStore::in_memory().unwrap();
        let conn = Arc::clone(&store.conn);
        let _ = std::thread::spawn(move || {
            let _guard = conn.lock().unwrap();
            panic!("poison the timeline lock");
        })
        .join();

        let event = MemoryEvent::new("u", MemoryEventType::QuizStarted, "x", Utc::now());
        assert!(matches!(store.record_event(&event), Err(StoreError::LockPoisoned)));
        assert!(matches!(store.get_user_memory("u"), Err(StoreError::LockPoisoned)));
    }

    #[test]
    fn test_event_type_names_round_trip() {
        for event_type in [
            MemoryEventType::ProfileSaved,
            MemoryEventType::TrackExplored,
            MemoryEventType::RoadmapGenerated,
            MemoryEventType::RoadmapRefreshed,
            MemoryEventType::TaskToggled,
            MemoryEventType::QuizStarted,
            MemoryEventType::AssessmentCompleted,
        ] {
            assert_eq!(MemoryEventType::parse(event_type.as_str()), Some(event_type));
        }
        assert_eq!(MemoryEventType::parse("resume_uploaded"), None);
    }
}
