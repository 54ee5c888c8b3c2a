use crate::models::*;
use crate::types::{AppError, AppResult, DocumentStatus};
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::BTreeMap;

/// Thin persistence façade over the five pipeline entities. Every write is a
/// single statement committed immediately: a later stage failing must not
/// roll back an earlier stage's audit record.
pub struct DatabaseOperations;

impl DatabaseOperations {
    // Document operations

    pub async fn create_document(
        pool: &SqlitePool,
        filename: &str,
        file_size: i64,
        mime_type: &str,
        original_content: &[u8],
    ) -> AppResult<Document> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO documents (filename, file_size, mime_type, upload_time, original_content, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(filename)
        .bind(file_size)
        .bind(mime_type)
        .bind(now)
        .bind(original_content)
        .bind(DocumentStatus::Uploaded.as_str())
        .fetch_one(pool)
        .await?;

        Ok(Document {
            id: row.get("id"),
            filename: filename.to_string(),
            file_size,
            mime_type: mime_type.to_string(),
            upload_time: now,
            processed_content: None,
            status: DocumentStatus::Uploaded.as_str().to_string(),
            error_message: None,
        })
    }

    pub async fn get_document(pool: &SqlitePool, document_id: i64) -> AppResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, filename, file_size, mime_type, upload_time, processed_content, status, error_message
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(document_id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    pub async fn update_document_status(
        pool: &SqlitePool,
        document_id: i64,
        status: DocumentStatus,
        error_message: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE documents SET status = ?, error_message = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(error_message)
            .bind(document_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn set_processed_content(
        pool: &SqlitePool,
        document_id: i64,
        content: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE documents SET processed_content = ? WHERE id = ?")
            .bind(content)
            .bind(document_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    // Intent operations (append-only; the max-id row per document is the
    // authoritative classification)

    pub async fn add_intent(
        pool: &SqlitePool,
        document_id: i64,
        intent_type: &str,
        confidence: f64,
    ) -> AppResult<IntentRecord> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO intents (document_id, intent_type, confidence, detected_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(document_id)
        .bind(intent_type)
        .bind(confidence)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(IntentRecord {
            id: row.get("id"),
            document_id,
            intent_type: intent_type.to_string(),
            confidence,
            detected_at: now,
        })
    }

    pub async fn get_document_intents(
        pool: &SqlitePool,
        document_id: i64,
    ) -> AppResult<Vec<IntentRecord>> {
        let intents = sqlx::query_as::<_, IntentRecord>(
            r#"
            SELECT id, document_id, intent_type, confidence, detected_at
            FROM intents
            WHERE document_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(pool)
        .await?;

        Ok(intents)
    }

    // Agent response operations (append-only audit history)

    pub async fn add_agent_response(
        pool: &SqlitePool,
        document_id: i64,
        intent_id: i64,
        agent_type: &str,
        response_data: &serde_json::Value,
        metadata: &serde_json::Value,
    ) -> AppResult<AgentResponse> {
        let now = Utc::now();
        let data_text = serde_json::to_string(response_data)
            .map_err(|e| AppError::Internal(format!("failed to encode response data: {}", e)))?;
        let metadata_text = serde_json::to_string(metadata)
            .map_err(|e| AppError::Internal(format!("failed to encode response metadata: {}", e)))?;

        let row = sqlx::query(
            r#"
            INSERT INTO agent_responses (document_id, intent_id, agent_type, response_data, processed_at, metadata)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(document_id)
        .bind(intent_id)
        .bind(agent_type)
        .bind(&data_text)
        .bind(now)
        .bind(&metadata_text)
        .fetch_one(pool)
        .await?;

        Ok(AgentResponse {
            id: row.get("id"),
            document_id,
            intent_id,
            agent_type: agent_type.to_string(),
            response_data: response_data.clone(),
            processed_at: now,
            metadata: metadata.clone(),
        })
    }

    pub async fn get_agent_responses(
        pool: &SqlitePool,
        document_id: i64,
    ) -> AppResult<Vec<AgentResponse>> {
        let rows = sqlx::query(
            r#"
            SELECT id, document_id, intent_id, agent_type, response_data, processed_at, metadata
            FROM agent_responses
            WHERE document_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(Self::agent_response_from_row).collect()
    }

    fn agent_response_from_row(row: sqlx::sqlite::SqliteRow) -> AppResult<AgentResponse> {
        let data_text: String = row.get("response_data");
        let metadata_text: String = row.get("metadata");

        Ok(AgentResponse {
            id: row.get("id"),
            document_id: row.get("document_id"),
            intent_id: row.get("intent_id"),
            agent_type: row.get("agent_type"),
            response_data: serde_json::from_str(&data_text)
                .map_err(|e| AppError::Internal(format!("corrupt response data: {}", e)))?,
            processed_at: row.get("processed_at"),
            metadata: serde_json::from_str(&metadata_text)
                .map_err(|e| AppError::Internal(format!("corrupt response metadata: {}", e)))?,
        })
    }

    // Document metadata (upsert, last-write-wins)

    pub async fn set_document_metadata(
        pool: &SqlitePool,
        document_id: i64,
        key: &str,
        value: &str,
        data_type: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO document_metadata (document_id, key, value, data_type)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (document_id, key) DO UPDATE SET value = excluded.value, data_type = excluded.data_type
            "#,
        )
        .bind(document_id)
        .bind(key)
        .bind(value)
        .bind(data_type)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// All metadata for a document as a JSON map, with values decoded
    /// according to their declared data_type.
    pub async fn get_all_document_metadata(
        pool: &SqlitePool,
        document_id: i64,
    ) -> AppResult<serde_json::Map<String, serde_json::Value>> {
        let rows = sqlx::query(
            "SELECT key, value, data_type FROM document_metadata WHERE document_id = ? ORDER BY key ASC",
        )
        .bind(document_id)
        .fetch_all(pool)
        .await?;

        let mut map = serde_json::Map::new();
        for row in rows {
            let key: String = row.get("key");
            let value: String = row.get("value");
            let data_type: String = row.get("data_type");
            map.insert(key, Self::decode_metadata_value(&value, &data_type));
        }

        Ok(map)
    }

    fn decode_metadata_value(value: &str, data_type: &str) -> serde_json::Value {
        match data_type {
            "number" => value
                .parse::<i64>()
                .map(serde_json::Value::from)
                .or_else(|_| value.parse::<f64>().map(serde_json::Value::from))
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string())),
            "boolean" => serde_json::Value::Bool(value == "true" || value == "1"),
            "json" => serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string())),
            _ => serde_json::Value::String(value.to_string()),
        }
    }

    // Follow-up operations

    pub async fn add_follow_up(
        pool: &SqlitePool,
        document_id: i64,
        action_type: &str,
        action_details: &serde_json::Value,
    ) -> AppResult<FollowUp> {
        let now = Utc::now();
        let details_text = serde_json::to_string(action_details)
            .map_err(|e| AppError::Internal(format!("failed to encode follow-up details: {}", e)))?;

        let row = sqlx::query(
            r#"
            INSERT INTO follow_ups (document_id, action_type, action_details, status, created_at)
            VALUES (?, ?, ?, 'pending', ?)
            RETURNING id
            "#,
        )
        .bind(document_id)
        .bind(action_type)
        .bind(&details_text)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(FollowUp {
            id: row.get("id"),
            document_id,
            action_type: action_type.to_string(),
            action_details: action_details.clone(),
            status: "pending".to_string(),
            created_at: now,
            completed_at: None,
        })
    }

    pub async fn get_follow_ups(pool: &SqlitePool, document_id: i64) -> AppResult<Vec<FollowUp>> {
        let rows = sqlx::query(
            r#"
            SELECT id, document_id, action_type, action_details, status, created_at, completed_at
            FROM follow_ups
            WHERE document_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let details_text: String = row.get("action_details");
                Ok(FollowUp {
                    id: row.get("id"),
                    document_id: row.get("document_id"),
                    action_type: row.get("action_type"),
                    action_details: serde_json::from_str(&details_text)
                        .map_err(|e| AppError::Internal(format!("corrupt follow-up details: {}", e)))?,
                    status: row.get("status"),
                    created_at: row.get("created_at"),
                    completed_at: row.get("completed_at"),
                })
            })
            .collect()
    }

    /// Marks a follow-up done. Called from the CRM side, never by the pipeline.
    pub async fn complete_follow_up(pool: &SqlitePool, follow_up_id: i64) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE follow_ups SET status = 'completed', completed_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(follow_up_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("follow-up {}", follow_up_id)));
        }

        Ok(())
    }

    // Listing and aggregates (dashboard)

    /// Paginated document listing, newest first, optionally filtered by
    /// status and by latest-known intent. Returns the page plus the total
    /// row count for pagination headers.
    pub async fn list_documents(
        pool: &SqlitePool,
        page: i64,
        page_size: i64,
        status: Option<&str>,
        intent: Option<&str>,
    ) -> AppResult<(Vec<DocumentListItem>, i64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        let offset = (page - 1) * page_size;

        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT d.id, d.filename, d.file_size, d.mime_type, d.upload_time, d.status, d.error_message,
                   i.intent_type, i.confidence
            FROM documents d
            LEFT JOIN (
                SELECT document_id, intent_type, confidence
                FROM intents
                WHERE id IN (SELECT MAX(id) FROM intents GROUP BY document_id)
            ) i ON d.id = i.document_id
            WHERE 1=1
            "#,
        );
        if let Some(status) = status {
            query.push(" AND d.status = ").push_bind(status.to_string());
        }
        if let Some(intent) = intent {
            query.push(" AND i.intent_type = ").push_bind(intent.to_string());
        }
        query
            .push(" ORDER BY d.upload_time DESC LIMIT ")
            .push_bind(page_size)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = query.build().fetch_all(pool).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.get("id");
            let metadata = Self::get_all_document_metadata(pool, id).await?;
            items.push(DocumentListItem {
                id,
                filename: row.get("filename"),
                file_size: row.get("file_size"),
                mime_type: row.get("mime_type"),
                upload_time: row.get("upload_time"),
                status: row.get("status"),
                error_message: row.get("error_message"),
                intent_type: row.get("intent_type"),
                confidence: row.get("confidence"),
                metadata,
            });
        }

        let mut count_query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT COUNT(DISTINCT d.id) AS total
            FROM documents d
            LEFT JOIN (
                SELECT document_id, intent_type
                FROM intents
                WHERE id IN (SELECT MAX(id) FROM intents GROUP BY document_id)
            ) i ON d.id = i.document_id
            WHERE 1=1
            "#,
        );
        if let Some(status) = status {
            count_query.push(" AND d.status = ").push_bind(status.to_string());
        }
        if let Some(intent) = intent {
            count_query.push(" AND i.intent_type = ").push_bind(intent.to_string());
        }

        let total: i64 = count_query.build().fetch_one(pool).await?.get("total");

        Ok((items, total))
    }

    pub async fn get_stats(pool: &SqlitePool) -> AppResult<StatsReport> {
        let total_documents: i64 = sqlx::query("SELECT COUNT(*) AS total FROM documents")
            .fetch_one(pool)
            .await?
            .get("total");

        let mut by_status = BTreeMap::new();
        let rows = sqlx::query("SELECT status, COUNT(*) AS count FROM documents GROUP BY status")
            .fetch_all(pool)
            .await?;
        for row in rows {
            by_status.insert(row.get::<String, _>("status"), row.get::<i64, _>("count"));
        }

        let mut by_intent = BTreeMap::new();
        let rows = sqlx::query(
            r#"
            SELECT i.intent_type, COUNT(*) AS count
            FROM documents d
            JOIN intents i ON d.id = i.document_id
            WHERE i.id IN (SELECT MAX(id) FROM intents GROUP BY document_id)
            GROUP BY i.intent_type
            "#,
        )
        .fetch_all(pool)
        .await?;
        for row in rows {
            by_intent.insert(row.get::<String, _>("intent_type"), row.get::<i64, _>("count"));
        }

        Ok(StatsReport {
            total_documents,
            by_status,
            by_intent,
            last_updated: Utc::now(),
        })
    }

    // Agent data view (dashboard rows over agent_responses ⋈ documents ⋈ intents)

    pub async fn list_agent_data(pool: &SqlitePool, limit: i64) -> AppResult<Vec<AgentDataView>> {
        let rows = sqlx::query(&format!("{} ORDER BY r.id DESC LIMIT ?", AGENT_DATA_SELECT))
            .bind(limit.clamp(1, 500))
            .fetch_all(pool)
            .await?;

        rows.into_iter().map(Self::agent_data_from_row).collect()
    }

    pub async fn get_agent_data(
        pool: &SqlitePool,
        response_id: i64,
    ) -> AppResult<Option<AgentDataView>> {
        let row = sqlx::query(&format!("{} WHERE r.id = ?", AGENT_DATA_SELECT))
            .bind(response_id)
            .fetch_optional(pool)
            .await?;

        row.map(Self::agent_data_from_row).transpose()
    }

    fn agent_data_from_row(row: sqlx::sqlite::SqliteRow) -> AppResult<AgentDataView> {
        let data_text: String = row.get("response_data");
        let followup_count: i64 = row.get("followup_count");
        let followup_notes = row
            .get::<Option<String>, _>("latest_followup")
            .and_then(|details| serde_json::from_str::<serde_json::Value>(&details).ok())
            .and_then(|details| details.get("notes").and_then(|n| n.as_str()).map(String::from));

        Ok(AgentDataView {
            id: row.get("id"),
            document_id: row.get("document_id"),
            processed_at: row.get("processed_at"),
            agent_type: row.get("agent_type"),
            file_name: row.get("file_name"),
            intent: row.get("intent"),
            data: serde_json::from_str(&data_text)
                .map_err(|e| AppError::Internal(format!("corrupt response data: {}", e)))?,
            status: row.get("status"),
            requires_followup: followup_count > 0,
            followup_notes,
        })
    }
}

const AGENT_DATA_SELECT: &str = r#"
    SELECT r.id, r.document_id, r.processed_at, r.agent_type, r.response_data,
           d.filename AS file_name, d.status,
           i.intent_type AS intent,
           (SELECT COUNT(*) FROM follow_ups f WHERE f.document_id = r.document_id) AS followup_count,
           (SELECT f.action_details FROM follow_ups f
            WHERE f.document_id = r.document_id ORDER BY f.id DESC LIMIT 1) AS latest_followup
    FROM agent_responses r
    JOIN documents d ON d.id = r.document_id
    JOIN intents i ON i.id = r.intent_id
"#;

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn sample_document(pool: &SqlitePool, filename: &str) -> Document {
        DatabaseOperations::create_document(pool, filename, 42, "application/pdf", b"%PDF-1.5")
            .await
            .expect("create document")
    }

    #[tokio::test]
    async fn test_document_starts_uploaded_and_moves_to_terminal_status() {
        let pool = test_pool().await;
        let doc = sample_document(&pool, "quote.pdf").await;
        assert_eq!(doc.status, "uploaded");

        DatabaseOperations::update_document_status(
            &pool,
            doc.id,
            DocumentStatus::Error,
            Some("The file appears to be empty"),
        )
        .await
        .unwrap();

        let stored = DatabaseOperations::get_document(&pool, doc.id)
            .await
            .unwrap()
            .expect("document exists");
        assert_eq!(stored.status, "error");
        assert_eq!(
            stored.error_message.as_deref(),
            Some("The file appears to be empty")
        );
    }

    #[tokio::test]
    async fn test_intents_are_append_only_and_latest_wins() {
        let pool = test_pool().await;
        let doc = sample_document(&pool, "letter.pdf").await;

        DatabaseOperations::add_intent(&pool, doc.id, "Invoice", 1.0)
            .await
            .unwrap();
        DatabaseOperations::add_intent(&pool, doc.id, "Complaint", 1.0)
            .await
            .unwrap();

        let intents = DatabaseOperations::get_document_intents(&pool, doc.id)
            .await
            .unwrap();
        assert_eq!(intents.len(), 2);

        let (items, _) = DatabaseOperations::list_documents(&pool, 1, 10, None, None)
            .await
            .unwrap();
        assert_eq!(items[0].intent_type.as_deref(), Some("Complaint"));
    }

    #[tokio::test]
    async fn test_metadata_upsert_is_last_write_wins() {
        let pool = test_pool().await;
        let doc = sample_document(&pool, "report.pdf").await;

        DatabaseOperations::set_document_metadata(&pool, doc.id, "page_count", "3", "number")
            .await
            .unwrap();
        DatabaseOperations::set_document_metadata(&pool, doc.id, "page_count", "7", "number")
            .await
            .unwrap();

        let metadata = DatabaseOperations::get_all_document_metadata(&pool, doc.id)
            .await
            .unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get("page_count"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn test_metadata_values_decode_by_declared_type() {
        let pool = test_pool().await;
        let doc = sample_document(&pool, "typed.pdf").await;

        DatabaseOperations::set_document_metadata(&pool, doc.id, "source_format", "pdf", "string")
            .await
            .unwrap();
        DatabaseOperations::set_document_metadata(&pool, doc.id, "reviewed", "true", "boolean")
            .await
            .unwrap();
        DatabaseOperations::set_document_metadata(&pool, doc.id, "tags", r#"["a","b"]"#, "json")
            .await
            .unwrap();

        let metadata = DatabaseOperations::get_all_document_metadata(&pool, doc.id)
            .await
            .unwrap();
        assert_eq!(metadata.get("source_format"), Some(&json!("pdf")));
        assert_eq!(metadata.get("reviewed"), Some(&json!(true)));
        assert_eq!(metadata.get("tags"), Some(&json!(["a", "b"])));
    }

    #[tokio::test]
    async fn test_pagination_returns_remainder_page_and_total() {
        let pool = test_pool().await;
        for n in 0..15 {
            sample_document(&pool, &format!("doc-{n}.pdf")).await;
        }

        let (items, total) = DatabaseOperations::list_documents(&pool, 2, 10, None, None)
            .await
            .unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(total, 15);
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_latest_intent() {
        let pool = test_pool().await;
        let processed = sample_document(&pool, "good.pdf").await;
        let failed = sample_document(&pool, "bad.pdf").await;

        DatabaseOperations::add_intent(&pool, processed.id, "RFQ", 1.0)
            .await
            .unwrap();
        DatabaseOperations::update_document_status(&pool, processed.id, DocumentStatus::Processed, None)
            .await
            .unwrap();
        DatabaseOperations::update_document_status(
            &pool,
            failed.id,
            DocumentStatus::Error,
            Some("Could not open PDF file"),
        )
        .await
        .unwrap();

        let (items, total) = DatabaseOperations::list_documents(&pool, 1, 10, Some("processed"), None)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].id, processed.id);

        let (items, total) = DatabaseOperations::list_documents(&pool, 1, 10, None, Some("RFQ"))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].intent_type.as_deref(), Some("RFQ"));
    }

    #[tokio::test]
    async fn test_agent_response_payload_round_trips() {
        let pool = test_pool().await;
        let doc = sample_document(&pool, "invoice.pdf").await;
        let intent = DatabaseOperations::add_intent(&pool, doc.id, "Invoice", 1.0)
            .await
            .unwrap();

        let payload = json!({
            "invoice_number": "INV-1001",
            "total_amount": 1249.50,
            "line_items": [{"description": "Laptop", "quantity": 2}],
            "due_date": null,
        });
        DatabaseOperations::add_agent_response(
            &pool,
            doc.id,
            intent.id,
            "invoice_agent",
            &payload,
            &json!({"model": "gemini-2.0-flash"}),
        )
        .await
        .unwrap();

        let responses = DatabaseOperations::get_agent_responses(&pool, doc.id)
            .await
            .unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].response_data, payload);
        assert_eq!(responses[0].agent_type, "invoice_agent");
    }

    #[tokio::test]
    async fn test_follow_up_lifecycle() {
        let pool = test_pool().await;
        let doc = sample_document(&pool, "complaint.pdf").await;

        let follow_up = DatabaseOperations::add_follow_up(
            &pool,
            doc.id,
            "complaint_review",
            &json!({"priority": "high", "assigned_to": "support"}),
        )
        .await
        .unwrap();
        assert_eq!(follow_up.status, "pending");

        DatabaseOperations::complete_follow_up(&pool, follow_up.id)
            .await
            .unwrap();

        let follow_ups = DatabaseOperations::get_follow_ups(&pool, doc.id).await.unwrap();
        assert_eq!(follow_ups[0].status, "completed");
        assert!(follow_ups[0].completed_at.is_some());

        let missing = DatabaseOperations::complete_follow_up(&pool, 9999).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_agent_data_view_joins_and_flags_followups() {
        let pool = test_pool().await;
        let doc = sample_document(&pool, "angry-customer.pdf").await;
        let intent = DatabaseOperations::add_intent(&pool, doc.id, "Complaint", 1.0)
            .await
            .unwrap();
        DatabaseOperations::add_agent_response(
            &pool,
            doc.id,
            intent.id,
            "complaint_agent",
            &json!({"severity": "high"}),
            &json!({}),
        )
        .await
        .unwrap();
        DatabaseOperations::add_follow_up(
            &pool,
            doc.id,
            "manual_review",
            &json!({"notes": "call the customer back"}),
        )
        .await
        .unwrap();

        let rows = DatabaseOperations::list_agent_data(&pool, 50).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_name, "angry-customer.pdf");
        assert_eq!(rows[0].intent, "Complaint");
        assert!(rows[0].requires_followup);
        assert_eq!(rows[0].followup_notes.as_deref(), Some("call the customer back"));

        let single = DatabaseOperations::get_agent_data(&pool, rows[0].id)
            .await
            .unwrap();
        assert!(single.is_some());
        assert!(DatabaseOperations::get_agent_data(&pool, 9999)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_stats_aggregates_by_status_and_latest_intent() {
        let pool = test_pool().await;
        let a = sample_document(&pool, "a.pdf").await;
        let b = sample_document(&pool, "b.pdf").await;

        DatabaseOperations::add_intent(&pool, a.id, "RFQ", 1.0).await.unwrap();
        DatabaseOperations::add_intent(&pool, a.id, "Invoice", 1.0).await.unwrap();
        DatabaseOperations::update_document_status(&pool, a.id, DocumentStatus::Processed, None)
            .await
            .unwrap();
        DatabaseOperations::update_document_status(&pool, b.id, DocumentStatus::Error, Some("boom"))
            .await
            .unwrap();

        let stats = DatabaseOperations::get_stats(&pool).await.unwrap();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.by_status.get("processed"), Some(&1));
        assert_eq!(stats.by_status.get("error"), Some(&1));
        // Reclassification means only the latest intent counts.
        assert_eq!(stats.by_intent.get("Invoice"), Some(&1));
        assert_eq!(stats.by_intent.get("RFQ"), None);
    }
}
