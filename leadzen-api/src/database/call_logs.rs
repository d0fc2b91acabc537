use crate::database::rows::{collect_valid, enum_column, optional_enum_column, tags_column};
use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, Row};
use shared_types::{CallDirection, CallLog, CallOutcome, CallStatus, CreateCallLogRequest};

const CALL_LOG_COLUMNS: &str = "id, lead_id, phone_number, contact_name, direction, status,
        started_at, ended_at, duration, notes, outcome, follow_up_required, tags,
        created_at, updated_at";

fn call_log_from_row(row: &Row) -> rusqlite::Result<CallLog> {
    Ok(CallLog {
        id: row.get(0)?,
        lead_id: row.get(1)?,
        phone_number: row.get(2)?,
        contact_name: row.get(3)?,
        direction: enum_column(row, 4, CallDirection::parse)?,
        status: enum_column(row, 5, CallStatus::parse)?,
        started_at: row.get(6)?,
        ended_at: row.get(7)?,
        duration: row.get(8)?,
        notes: row.get(9)?,
        outcome: optional_enum_column(row, 10, CallOutcome::parse)?,
        follow_up_required: row.get(11)?,
        tags: tags_column(row, 12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

pub async fn insert_call_log(
    conn: AsyncDbConnection,
    request: &CreateCallLogRequest,
) -> Result<CallLog> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let duration = request.duration.max(0);
    let follow_up_required = matches!(
        request.outcome,
        Some(CallOutcome::CallbackRequested) | Some(CallOutcome::FollowUpNeeded)
    );

    let id: i64 = conn.query_row(
        "INSERT INTO call_logs
         (lead_id, phone_number, contact_name, direction, status, started_at, ended_at,
          duration, notes, outcome, follow_up_required, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         RETURNING id",
        params![
            request.lead_id,
            request.phone_number,
            request.contact_name,
            request.direction.as_str(),
            request.status.as_str(),
            request.started_at,
            request.ended_at,
            duration,
            request.notes,
            request.outcome.map(|o| o.as_str()),
            follow_up_required,
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(CallLog {
        id,
        lead_id: request.lead_id,
        phone_number: request.phone_number.clone(),
        contact_name: request.contact_name.clone(),
        direction: request.direction,
        status: request.status,
        started_at: request.started_at,
        ended_at: request.ended_at,
        duration,
        notes: request.notes.clone(),
        outcome: request.outcome,
        follow_up_required,
        tags: vec![],
        created_at: now,
        updated_at: now,
    })
}

/// Most recent first. `lead_id` of `None` lists every call.
pub async fn list_call_logs(
    conn: AsyncDbConnection,
    lead_id: Option<i64>,
    limit: usize,
    offset: usize,
) -> Result<Vec<CallLog>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM call_logs
         WHERE (?1 IS NULL OR lead_id = ?1)
         ORDER BY started_at DESC, id DESC
         LIMIT ?2 OFFSET ?3",
        CALL_LOG_COLUMNS
    ))?;

    let rows = stmt.query_map(
        params![lead_id, limit as i64, offset as i64],
        call_log_from_row,
    )?;
    Ok(collect_valid(rows, "call_logs"))
}

pub async fn count_call_logs(conn: AsyncDbConnection) -> Result<i64> {
    let conn = conn.lock().await?;
    Ok(conn.query_row("SELECT COUNT(*) FROM call_logs", [], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::temp_database;

    fn request(phone: &str, started_at: i64, outcome: Option<CallOutcome>) -> CreateCallLogRequest {
        CreateCallLogRequest {
            lead_id: None,
            phone_number: phone.to_string(),
            contact_name: None,
            direction: CallDirection::Outbound,
            status: CallStatus::Ended,
            started_at,
            ended_at: Some(started_at + 90),
            duration: 90,
            notes: None,
            outcome,
        }
    }

    #[tokio::test]
    async fn test_insert_flags_follow_up_outcomes() {
        let (_dir, db) = temp_database();

        let call = insert_call_log(
            db.async_connection.clone(),
            &request("9876543210", 100, Some(CallOutcome::CallbackRequested)),
        )
        .await
        .unwrap();

        assert!(call.follow_up_required);
        let listed = list_call_logs(db.async_connection.clone(), None, 10, 0).await.unwrap();
        assert_eq!(listed, vec![call]);
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let (_dir, db) = temp_database();
        for started_at in [100, 300, 200] {
            insert_call_log(
                db.async_connection.clone(),
                &request("9876543210", started_at, None),
            )
            .await
            .unwrap();
        }

        let calls = list_call_logs(db.async_connection.clone(), None, 10, 0).await.unwrap();
        let started: Vec<i64> = calls.iter().map(|c| c.started_at).collect();

        assert_eq!(started, vec![300, 200, 100]);
        assert_eq!(count_call_logs(db.async_connection.clone()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_for_one_lead() {
        let (_dir, db) = temp_database();
        {
            let conn = db.connection.lock().unwrap();
            conn.execute(
                "INSERT INTO leads (id, name, created_at, updated_at) VALUES (7, 'Ravi Kumar', 1, 1)",
                [],
            )
            .unwrap();
        }
        let mut linked = request("9876543210", 200, None);
        linked.lead_id = Some(7);
        insert_call_log(db.async_connection.clone(), &linked).await.unwrap();
        insert_call_log(db.async_connection.clone(), &request("9123456780", 300, None))
            .await
            .unwrap();

        let calls = list_call_logs(db.async_connection.clone(), Some(7), 10, 0)
            .await
            .unwrap();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].lead_id, Some(7));
    }
}
