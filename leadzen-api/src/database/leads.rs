use crate::database::rows::{collect_valid, enum_column, tags_column, tags_to_json};
use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use leadzen_core::dedupe_tags;
use shared_types::{CreateLeadRequest, Lead, LeadPriority, LeadStatus, UpdateLeadRequest};

const LEAD_COLUMNS: &str = "id, name, email, phone, company, position, source, status, priority,
        value, notes, tags, created_at, updated_at, last_contacted_at, next_follow_up_at";

fn lead_from_row(row: &Row) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        company: row.get(4)?,
        position: row.get(5)?,
        source: row.get(6)?,
        status: enum_column(row, 7, LeadStatus::parse)?,
        priority: enum_column(row, 8, LeadPriority::parse)?,
        value: row.get(9)?,
        notes: row.get(10)?,
        tags: tags_column(row, 11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
        last_contacted_at: row.get(14)?,
        next_follow_up_at: row.get(15)?,
    })
}

pub async fn insert_lead(conn: AsyncDbConnection, request: &CreateLeadRequest) -> Result<Lead> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let status = request.status.unwrap_or(LeadStatus::New);
    let priority = request.priority.unwrap_or(LeadPriority::Medium);
    let source = request.source.clone().unwrap_or_else(|| "manual".to_string());
    let mut tag_list = request.tags.clone();
    dedupe_tags(&mut tag_list);
    let tags = tags_to_json(&tag_list)?;

    let id: i64 = conn.query_row(
        "INSERT INTO leads
         (name, email, phone, company, position, source, status, priority, value, notes, tags,
          created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         RETURNING id",
        params![
            request.name.trim(),
            request.email,
            request.phone,
            request.company,
            request.position,
            source,
            status.as_str(),
            priority.as_str(),
            request.value,
            request.notes,
            tags,
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(Lead {
        id,
        name: request.name.trim().to_string(),
        email: request.email.clone(),
        phone: Some(request.phone.clone()),
        company: request.company.clone(),
        position: request.position.clone(),
        source,
        status,
        priority,
        value: request.value,
        notes: request.notes.clone(),
        tags: tag_list,
        created_at: now,
        updated_at: now,
        last_contacted_at: None,
        next_follow_up_at: None,
    })
}

pub async fn get_lead(conn: AsyncDbConnection, id: i64) -> Result<Option<Lead>> {
    let conn = conn.lock().await?;

    let lead = conn
        .query_row(
            &format!("SELECT {} FROM leads WHERE id = ?1", LEAD_COLUMNS),
            [id],
            lead_from_row,
        )
        .optional()
        .map_err(|e| anyhow::anyhow!("Failed to get lead: {}", e))?;

    Ok(lead)
}

pub async fn list_leads(conn: AsyncDbConnection, limit: usize, offset: usize) -> Result<Vec<Lead>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM leads ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        LEAD_COLUMNS
    ))?;

    let rows = stmt.query_map(params![limit as i64, offset as i64], lead_from_row)?;
    Ok(collect_valid(rows, "leads"))
}

/// Applies the fields that are set in one statement. Returns `None` when no lead has that id.
pub async fn update_lead(
    conn: AsyncDbConnection,
    id: i64,
    request: &UpdateLeadRequest,
) -> Result<Option<Lead>> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let tags = match &request.tags {
        Some(tags) => {
            let mut tags = tags.clone();
            dedupe_tags(&mut tags);
            Some(tags_to_json(&tags)?)
        }
        None => None,
    };

    let lead = conn
        .query_row(
            &format!(
                "UPDATE leads SET
                    name = COALESCE(?1, name),
                    email = COALESCE(?2, email),
                    phone = COALESCE(?3, phone),
                    company = COALESCE(?4, company),
                    position = COALESCE(?5, position),
                    status = COALESCE(?6, status),
                    priority = COALESCE(?7, priority),
                    value = COALESCE(?8, value),
                    notes = COALESCE(?9, notes),
                    tags = COALESCE(?10, tags),
                    next_follow_up_at = COALESCE(?11, next_follow_up_at),
                    updated_at = ?12
                 WHERE id = ?13
                 RETURNING {}",
                LEAD_COLUMNS
            ),
            params![
                request.name.as_deref().map(str::trim),
                request.email,
                request.phone,
                request.company,
                request.position,
                request.status.map(|s| s.as_str()),
                request.priority.map(|p| p.as_str()),
                request.value,
                request.notes,
                tags,
                request.next_follow_up_at,
                now,
                id
            ],
            lead_from_row,
        )
        .optional()?;

    Ok(lead)
}

/// Deletes the lead and its notes; its calls stay in the history unlinked
pub async fn delete_lead(conn: AsyncDbConnection, id: i64) -> Result<bool> {
    let conn = conn.lock().await?;
    let deleted = conn.execute("DELETE FROM leads WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

pub async fn count_leads(conn: AsyncDbConnection) -> Result<i64> {
    let conn = conn.lock().await?;
    Ok(conn.query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?)
}

pub async fn touch_last_contacted(conn: AsyncDbConnection, id: i64, at: i64) -> Result<()> {
    let conn = conn.lock().await?;
    conn.execute(
        "UPDATE leads SET last_contacted_at = ?1, updated_at = ?1 WHERE id = ?2",
        params![at, id],
    )?;
    Ok(())
}
