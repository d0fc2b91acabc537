use crate::database::rows::{collect_valid, enum_column};
use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use shared_types::{CreateNoteRequest, Note, NoteTag, UpdateNoteRequest};

const NOTE_COLUMNS: &str =
    "id, lead_id, call_log_id, content, tag, created_by, created_at, updated_at";

const DEFAULT_AUTHOR: &str = "You";

fn note_from_row(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        lead_id: row.get(1)?,
        call_log_id: row.get(2)?,
        content: row.get(3)?,
        tag: enum_column(row, 4, NoteTag::parse)?,
        created_by: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub async fn insert_note(
    conn: AsyncDbConnection,
    lead_id: i64,
    request: &CreateNoteRequest,
) -> Result<Note> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let tag = request.tag.unwrap_or(if request.call_log_id.is_some() {
        NoteTag::CallRelated
    } else {
        NoteTag::General
    });
    let created_by = request
        .created_by
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_AUTHOR);

    let note = conn.query_row(
        &format!(
            "INSERT INTO lead_notes (lead_id, call_log_id, content, tag, created_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {}",
            NOTE_COLUMNS
        ),
        params![
            lead_id,
            request.call_log_id,
            request.content.trim(),
            tag.as_str(),
            created_by,
            now
        ],
        note_from_row,
    )?;

    Ok(note)
}

pub async fn get_note(conn: AsyncDbConnection, id: i64) -> Result<Option<Note>> {
    let conn = conn.lock().await?;

    let note = conn
        .query_row(
            &format!("SELECT {} FROM lead_notes WHERE id = ?1", NOTE_COLUMNS),
            [id],
            note_from_row,
        )
        .optional()
        .map_err(|e| anyhow::anyhow!("Failed to get note: {}", e))?;

    Ok(note)
}

/// Notes in the order they were written. `lead_id` of `None` lists every lead's notes.
pub async fn list_notes(
    conn: AsyncDbConnection,
    lead_id: Option<i64>,
    limit: usize,
    offset: usize,
) -> Result<Vec<Note>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM lead_notes
         WHERE (?1 IS NULL OR lead_id = ?1)
         ORDER BY created_at, id
         LIMIT ?2 OFFSET ?3",
        NOTE_COLUMNS
    ))?;

    let rows = stmt.query_map(params![lead_id, limit as i64, offset as i64], note_from_row)?;
    Ok(collect_valid(rows, "lead_notes"))
}

/// Applies the fields that are set. Returns `None` when no note has that id.
pub async fn update_note(
    conn: AsyncDbConnection,
    id: i64,
    request: &UpdateNoteRequest,
) -> Result<Option<Note>> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let note = conn
        .query_row(
            &format!(
                "UPDATE lead_notes
                 SET content = COALESCE(?1, content), tag = COALESCE(?2, tag), updated_at = ?3
                 WHERE id = ?4
                 RETURNING {}",
                NOTE_COLUMNS
            ),
            params![
                request.content.as_deref().map(str::trim),
                request.tag.map(|t| t.as_str()),
                now,
                id
            ],
            note_from_row,
        )
        .optional()?;

    Ok(note)
}

pub async fn delete_note(conn: AsyncDbConnection, id: i64) -> Result<bool> {
    let conn = conn.lock().await?;
    let deleted = conn.execute("DELETE FROM lead_notes WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::leads::{delete_lead, insert_lead};
    use crate::database::testing::temp_database;
    use shared_types::CreateLeadRequest;

    async fn lead_id(conn: AsyncDbConnection, name: &str) -> i64 {
        let request = CreateLeadRequest {
            name: name.to_string(),
            email: None,
            phone: "9876543210".to_string(),
            company: None,
            position: None,
            source: None,
            status: None,
            priority: None,
            value: None,
            notes: None,
            tags: vec![],
        };
        insert_lead(conn, &request).await.unwrap().id
    }

    fn note(content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            content: content.to_string(),
            tag: None,
            created_by: None,
            call_log_id: None,
        }
    }

    #[tokio::test]
    async fn test_notes_are_scoped_to_their_lead() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let ravi = lead_id(conn.clone(), "Ravi Kumar").await;
        let meera = lead_id(conn.clone(), "Meera Iyer").await;

        let first = insert_note(conn.clone(), ravi, &note("Wants a demo")).await.unwrap();
        insert_note(conn.clone(), meera, &note("Call after Diwali")).await.unwrap();
        insert_note(conn.clone(), ravi, &note("Sent brochure")).await.unwrap();

        let notes = list_notes(conn.clone(), Some(ravi), 10, 0).await.unwrap();
        let contents: Vec<&str> = notes.iter().map(|n| n.content.as_str()).collect();

        assert_eq!(contents, vec!["Wants a demo", "Sent brochure"]);
        assert_eq!(first.tag, NoteTag::General);
        assert_eq!(first.created_by, "You");
        assert_eq!(list_notes(conn, None, 10, 0).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let ravi = lead_id(conn.clone(), "Ravi Kumar").await;
        let created = insert_note(conn.clone(), ravi, &note("Wants a demo")).await.unwrap();

        let updated = update_note(
            conn.clone(),
            created.id,
            &UpdateNoteRequest {
                tag: Some(NoteTag::FollowUp),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.content, "Wants a demo");
        assert_eq!(updated.tag, NoteTag::FollowUp);
        assert!(update_note(conn, 999, &UpdateNoteRequest::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_deleting_lead_removes_its_notes() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let ravi = lead_id(conn.clone(), "Ravi Kumar").await;
        let created = insert_note(conn.clone(), ravi, &note("Wants a demo")).await.unwrap();

        assert!(delete_lead(conn.clone(), ravi).await.unwrap());

        assert!(get_note(conn.clone(), created.id).await.unwrap().is_none());
        assert!(!delete_note(conn, created.id).await.unwrap());
    }
}
