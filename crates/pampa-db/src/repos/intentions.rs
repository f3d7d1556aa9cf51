//! `intention_cache` repo: direct-hit query-to-chunk mappings.

use crate::db::PampaDb;
use crate::error::DatabaseError;
use chrono::{DateTime, Utc};

/// A learned mapping from a normalized query to the chunk it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentionMapping {
    pub query_normalized: String,
    pub original_query: String,
    pub target_sha: String,
    pub confidence: f64,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl PampaDb {
    /// Direct-hit lookup by normalized query text.
    pub async fn find_intention(&self, query_normalized: &str) -> Result<Option<IntentionMapping>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT query_normalized, original_query, target_sha, confidence, usage_count, created_at, last_used
                 FROM intention_cache WHERE query_normalized = ?1",
                libsql::params![query_normalized],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_mapping(&row)?)),
            None => Ok(None),
        }
    }

    /// Record or reinforce an intention mapping: insert on first sight,
    /// bump `usage_count` and `last_used` and raise `confidence` toward 1.0
    /// on repeat hits.
    pub async fn record_intention(
        &self,
        query_normalized: &str,
        original_query: &str,
        target_sha: &str,
        confidence: f64,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO intention_cache (query_normalized, original_query, target_sha, confidence, usage_count, created_at, last_used)
                 VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
                 ON CONFLICT(query_normalized) DO UPDATE SET
                    target_sha = excluded.target_sha,
                    usage_count = usage_count + 1,
                    confidence = MIN(1.0, confidence + (1.0 - confidence) * 0.2),
                    last_used = excluded.last_used",
                libsql::params![query_normalized, original_query, target_sha, confidence, now],
            )
            .await?;
        Ok(())
    }
}

fn row_to_mapping(row: &libsql::Row) -> Result<IntentionMapping, DatabaseError> {
    Ok(IntentionMapping {
        query_normalized: row.get(0)?,
        original_query: row.get(1)?,
        target_sha: row.get(2)?,
        confidence: row.get(3)?,
        usage_count: u64::try_from(row.get::<i64>(4)?).unwrap_or_default(),
        created_at: parse_rfc3339(&row.get::<String>(5)?)?,
        last_used: parse_rfc3339(&row.get::<String>(6)?)?,
    })
}

fn parse_rfc3339(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::InvalidRow(format!("bad timestamp {raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_finds_intention() {
        let db = PampaDb::open_in_memory().await.unwrap();
        db.record_intention("start a checkout", "Start a checkout", "abcd1234", 0.6).await.unwrap();
        let found = db.find_intention("start a checkout").await.unwrap().unwrap();
        assert_eq!(found.target_sha, "abcd1234");
        assert_eq!(found.usage_count, 1);
    }

    #[tokio::test]
    async fn repeat_hits_raise_confidence_and_usage() {
        let db = PampaDb::open_in_memory().await.unwrap();
        db.record_intention("q", "Q", "sha1", 0.5).await.unwrap();
        db.record_intention("q", "Q", "sha1", 0.5).await.unwrap();
        let found = db.find_intention("q").await.unwrap().unwrap();
        assert_eq!(found.usage_count, 2);
        assert!(found.confidence > 0.5);
    }

    #[tokio::test]
    async fn missing_query_returns_none() {
        let db = PampaDb::open_in_memory().await.unwrap();
        assert!(db.find_intention("nope").await.unwrap().is_none());
    }
}
