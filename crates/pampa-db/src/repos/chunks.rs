//! `code_chunks` repo: upsert, lookup, deletion, and provider-scoped listing.

use crate::db::{PampaDb, decode_embedding, encode_embedding};
use crate::error::DatabaseError;
use pampa_core::{ChunkType, CodeChunk, ImportantVariable, Language};

impl PampaDb {
    /// Insert or replace a chunk row, keyed by `chunk_id`.
    pub async fn upsert_chunk(&self, chunk: &CodeChunk) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO code_chunks (
                    chunk_id, file_path, symbol, sha, lang, chunk_type,
                    embedding_provider, embedding_dimensions, embedding,
                    tags, intent, description, doc_comments, variables,
                    context_info, signature, parameters, return_type,
                    calls, call_targets, callers, symbol_neighbors,
                    encrypted, created_at, updated_at
                ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23,?24,?25)
                ON CONFLICT(chunk_id) DO UPDATE SET
                    file_path = excluded.file_path,
                    symbol = excluded.symbol,
                    sha = excluded.sha,
                    lang = excluded.lang,
                    chunk_type = excluded.chunk_type,
                    embedding_provider = excluded.embedding_provider,
                    embedding_dimensions = excluded.embedding_dimensions,
                    embedding = excluded.embedding,
                    tags = excluded.tags,
                    intent = excluded.intent,
                    description = excluded.description,
                    doc_comments = excluded.doc_comments,
                    variables = excluded.variables,
                    context_info = excluded.context_info,
                    signature = excluded.signature,
                    parameters = excluded.parameters,
                    return_type = excluded.return_type,
                    calls = excluded.calls,
                    call_targets = excluded.call_targets,
                    callers = excluded.callers,
                    symbol_neighbors = excluded.symbol_neighbors,
                    encrypted = excluded.encrypted,
                    updated_at = excluded.updated_at",
                libsql::params![
                    chunk.chunk_id.as_str(),
                    chunk.file_path.as_str(),
                    chunk.symbol.as_str(),
                    chunk.sha.as_str(),
                    chunk.lang.as_str(),
                    chunk.chunk_type.as_str(),
                    chunk.embedding_provider.as_str(),
                    i64::from(chunk.embedding_dimensions),
                    encode_embedding(&chunk.embedding),
                    serde_json::to_string(&chunk.tags).unwrap_or_default(),
                    chunk.intent.clone(),
                    chunk.description.clone(),
                    chunk.doc_comments.clone(),
                    serde_json::to_string(&chunk.variables).unwrap_or_default(),
                    chunk.context_info.as_ref().map(std::string::ToString::to_string),
                    chunk.signature.clone(),
                    serde_json::to_string(&chunk.parameters).unwrap_or_default(),
                    chunk.return_type.clone(),
                    serde_json::to_string(&chunk.calls).unwrap_or_default(),
                    serde_json::to_string(&chunk.call_targets).unwrap_or_default(),
                    serde_json::to_string(&chunk.callers).unwrap_or_default(),
                    serde_json::to_string(&chunk.symbol_neighbors).unwrap_or_default(),
                    i64::from(chunk.encrypted),
                    chunk.created_at.to_rfc3339(),
                    chunk.updated_at.to_rfc3339(),
                ],
            )
            .await?;
        Ok(())
    }

    /// Fetch a single chunk by id.
    pub async fn get_chunk(&self, chunk_id: &str) -> Result<Option<CodeChunk>, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT * FROM code_chunks WHERE chunk_id = ?1", libsql::params![chunk_id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_chunk(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch a chunk by its content sha rather than its composite id,
    /// for resolving an intention cache hit (`target_sha` -> chunk row).
    pub async fn find_chunk_by_sha(&self, sha: &str) -> Result<Option<CodeChunk>, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT * FROM code_chunks WHERE sha = ?1 LIMIT 1", libsql::params![sha])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_chunk(&row)?)),
            None => Ok(None),
        }
    }

    /// List every chunk for a given `(provider, dimensions)` pair,
    /// the unit search runs over.
    pub async fn list_chunks_for_provider(
        &self,
        provider: &str,
        dimensions: u32,
    ) -> Result<Vec<CodeChunk>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT * FROM code_chunks WHERE embedding_provider = ?1 AND embedding_dimensions = ?2",
                libsql::params![provider, i64::from(dimensions)],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_chunk(&row)?);
        }
        Ok(out)
    }

    /// All chunk ids currently indexed for `file_path`.
    pub async fn chunk_ids_for_file(&self, file_path: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT chunk_id FROM code_chunks WHERE file_path = ?1", libsql::params![file_path])
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row.get::<String>(0)?);
        }
        Ok(out)
    }

    /// Delete a chunk row by id.
    pub async fn delete_chunk(&self, chunk_id: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM code_chunks WHERE chunk_id = ?1", libsql::params![chunk_id])
            .await?;
        Ok(())
    }

    /// Delete every chunk row for `file_path` (file removed from disk).
    pub async fn delete_chunks_for_file(&self, file_path: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM code_chunks WHERE file_path = ?1", libsql::params![file_path])
            .await?;
        Ok(())
    }

    /// Total indexed chunk count, for overview reporting.
    pub async fn count_chunks(&self) -> Result<u64, DatabaseError> {
        let mut rows = self.conn().query("SELECT COUNT(*) FROM code_chunks", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?.max(0) as u64)
    }

    /// Most recently touched chunks across every provider, newest
    /// first. Backs the project overview rather than search, so it
    /// isn't scoped to a single `(provider, dimensions)` pair.
    pub async fn recent_chunks(&self, limit: u32) -> Result<Vec<CodeChunk>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT * FROM code_chunks ORDER BY updated_at DESC LIMIT ?1",
                libsql::params![i64::from(limit)],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_chunk(&row)?);
        }
        Ok(out)
    }
}

fn row_to_chunk(row: &libsql::Row) -> Result<CodeChunk, DatabaseError> {
    let lang_str: String = row.get(4)?;
    let lang = lang_from_str(&lang_str)?;
    let chunk_type_str: String = row.get(5)?;
    let chunk_type = chunk_type_from_str(&chunk_type_str)?;

    let embedding_bytes: Vec<u8> = row.get(8)?;
    let context_info_raw: Option<String> = row.get(14)?;

    Ok(CodeChunk {
        chunk_id: row.get(0)?,
        file_path: row.get(1)?,
        symbol: row.get(2)?,
        sha: row.get(3)?,
        lang,
        chunk_type,
        embedding_provider: row.get(6)?,
        embedding_dimensions: u32::try_from(row.get::<i64>(7)?).unwrap_or_default(),
        embedding: decode_embedding(&embedding_bytes)?,
        tags: parse_json_vec(&row.get::<String>(9)?),
        intent: row.get(10)?,
        description: row.get(11)?,
        doc_comments: row.get(12)?,
        variables: parse_json_or_default::<Vec<ImportantVariable>>(&row.get::<String>(13)?),
        context_info: context_info_raw.and_then(|s| serde_json::from_str(&s).ok()),
        signature: row.get(15)?,
        parameters: parse_json_vec(&row.get::<String>(16)?),
        return_type: row.get(17)?,
        calls: parse_json_vec(&row.get::<String>(18)?),
        call_targets: parse_json_vec(&row.get::<String>(19)?),
        callers: parse_json_vec(&row.get::<String>(20)?),
        symbol_neighbors: parse_json_vec(&row.get::<String>(21)?),
        encrypted: row.get::<i64>(22)? != 0,
        created_at: parse_rfc3339(&row.get::<String>(23)?)?,
        updated_at: parse_rfc3339(&row.get::<String>(24)?)?,
    })
}

fn parse_json_vec(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn parse_json_or_default<T: Default + serde::de::DeserializeOwned>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_default()
}

fn parse_rfc3339(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, DatabaseError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| DatabaseError::InvalidRow(format!("bad timestamp {raw}: {e}")))
}

fn lang_from_str(raw: &str) -> Result<Language, DatabaseError> {
    match raw {
        "php" => Ok(Language::Php),
        "python" => Ok(Language::Python),
        "javascript" => Ok(Language::JavaScript),
        "typescript" => Ok(Language::TypeScript),
        "tsx" => Ok(Language::Tsx),
        "go" => Ok(Language::Go),
        "java" => Ok(Language::Java),
        other => Err(DatabaseError::InvalidRow(format!("unknown lang {other}"))),
    }
}

fn chunk_type_from_str(raw: &str) -> Result<ChunkType, DatabaseError> {
    match raw {
        "function" => Ok(ChunkType::Function),
        "method" => Ok(ChunkType::Method),
        "class" => Ok(ChunkType::Class),
        "file" => Ok(ChunkType::File),
        other => Err(DatabaseError::InvalidRow(format!("unknown chunk_type {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pampa_core::ChunkType;

    fn sample_chunk() -> CodeChunk {
        let now = chrono::Utc::now();
        CodeChunk {
            chunk_id: "src/a.php:foo:abcd1234".to_string(),
            file_path: "src/a.php".to_string(),
            symbol: "foo".to_string(),
            sha: "abcd1234ef".to_string(),
            lang: Language::Php,
            chunk_type: ChunkType::Function,
            embedding_provider: "local".to_string(),
            embedding_dimensions: 3,
            embedding: vec![0.1, 0.2, 0.3],
            tags: vec!["stripe".to_string()],
            intent: None,
            description: None,
            doc_comments: None,
            variables: Vec::new(),
            context_info: None,
            signature: Some("foo()".to_string()),
            parameters: Vec::new(),
            return_type: None,
            calls: Vec::new(),
            call_targets: Vec::new(),
            callers: Vec::new(),
            symbol_neighbors: Vec::new(),
            encrypted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn upserts_and_fetches_chunk() {
        let db = PampaDb::open_in_memory().await.unwrap();
        let chunk = sample_chunk();
        db.upsert_chunk(&chunk).await.unwrap();
        let fetched = db.get_chunk(&chunk.chunk_id).await.unwrap().unwrap();
        assert_eq!(fetched.symbol, "foo");
        assert_eq!(fetched.embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(fetched.tags, vec!["stripe".to_string()]);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_row() {
        let db = PampaDb::open_in_memory().await.unwrap();
        let mut chunk = sample_chunk();
        db.upsert_chunk(&chunk).await.unwrap();
        chunk.sha = "newsha0000".to_string();
        db.upsert_chunk(&chunk).await.unwrap();
        assert_eq!(db.count_chunks().await.unwrap(), 1);
        let fetched = db.get_chunk(&chunk.chunk_id).await.unwrap().unwrap();
        assert_eq!(fetched.sha, "newsha0000");
    }

    #[tokio::test]
    async fn deletes_chunks_for_file() {
        let db = PampaDb::open_in_memory().await.unwrap();
        db.upsert_chunk(&sample_chunk()).await.unwrap();
        db.delete_chunks_for_file("src/a.php").await.unwrap();
        assert_eq!(db.count_chunks().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn recent_chunks_orders_newest_first_across_providers() {
        let db = PampaDb::open_in_memory().await.unwrap();

        let mut older = sample_chunk();
        older.chunk_id = "src/a.php:foo:abcd1234".to_string();
        older.embedding_provider = "openai".to_string();
        older.updated_at = chrono::Utc::now() - chrono::Duration::seconds(60);
        db.upsert_chunk(&older).await.unwrap();

        let mut newer = sample_chunk();
        newer.chunk_id = "src/b.php:bar:ef567890".to_string();
        newer.symbol = "bar".to_string();
        newer.embedding_provider = "local".to_string();
        db.upsert_chunk(&newer).await.unwrap();

        let recent = db.recent_chunks(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].symbol, "bar");
        assert_eq!(recent[1].symbol, "foo");
    }

    #[tokio::test]
    async fn finds_chunk_by_sha() {
        let db = PampaDb::open_in_memory().await.unwrap();
        let chunk = sample_chunk();
        db.upsert_chunk(&chunk).await.unwrap();
        let found = db.find_chunk_by_sha(&chunk.sha).await.unwrap().unwrap();
        assert_eq!(found.chunk_id, chunk.chunk_id);
        assert!(db.find_chunk_by_sha("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_chunks_respects_the_limit() {
        let db = PampaDb::open_in_memory().await.unwrap();
        for i in 0..5 {
            let mut chunk = sample_chunk();
            chunk.chunk_id = format!("src/a.php:fn{i}:abcd1234");
            chunk.symbol = format!("fn{i}");
            db.upsert_chunk(&chunk).await.unwrap();
        }
        let recent = db.recent_chunks(2).await.unwrap();
        assert_eq!(recent.len(), 2);
    }
}
