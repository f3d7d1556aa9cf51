//! `query_patterns` repo: masked-query frequency tracking for analytics.

use crate::db::PampaDb;
use crate::error::DatabaseError;
use chrono::Utc;

/// A masked query pattern with its observed frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPattern {
    pub pattern: String,
    pub frequency: u64,
}

impl PampaDb {
    /// Bump a pattern's frequency, inserting it at frequency 1 if new.
    pub async fn record_query_pattern(&self, pattern: &str) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO query_patterns (pattern, frequency, updated_at) VALUES (?1, 1, ?2)
                 ON CONFLICT(pattern) DO UPDATE SET
                    frequency = frequency + 1,
                    updated_at = excluded.updated_at",
                libsql::params![pattern, now],
            )
            .await?;
        Ok(())
    }

    /// The most frequent query patterns, most frequent first.
    pub async fn top_query_patterns(&self, limit: u32) -> Result<Vec<QueryPattern>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT pattern, frequency FROM query_patterns ORDER BY frequency DESC, pattern ASC LIMIT ?1",
                libsql::params![i64::from(limit)],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(QueryPattern {
                pattern: row.get(0)?,
                frequency: u64::try_from(row.get::<i64>(1)?).unwrap_or_default(),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_ranks_patterns() {
        let db = PampaDb::open_in_memory().await.unwrap();
        db.record_query_pattern("how to N").await.unwrap();
        db.record_query_pattern("how to N").await.unwrap();
        db.record_query_pattern("what is N").await.unwrap();
        let top = db.top_query_patterns(10).await.unwrap();
        assert_eq!(top[0].pattern, "how to N");
        assert_eq!(top[0].frequency, 2);
    }

    #[tokio::test]
    async fn limit_is_respected() {
        let db = PampaDb::open_in_memory().await.unwrap();
        for i in 0..5 {
            db.record_query_pattern(&format!("pattern {i}")).await.unwrap();
        }
        assert_eq!(db.top_query_patterns(2).await.unwrap().len(), 2);
    }
}
