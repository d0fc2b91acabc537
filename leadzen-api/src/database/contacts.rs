use crate::database::rows::{collect_valid, enum_column, tags_column, tags_to_json};
use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use leadzen_core::dedupe_tags;
use shared_types::{Contact, ContactCategory, CreateContactRequest};

const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, phone, company, position,
        address, notes, tags, category, is_favorite, created_at, updated_at, last_contacted_at";

fn contact_from_row(row: &Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        company: row.get(5)?,
        position: row.get(6)?,
        address: row.get(7)?,
        notes: row.get(8)?,
        tags: tags_column(row, 9)?,
        category: enum_column(row, 10, ContactCategory::parse)?,
        is_favorite: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
        last_contacted_at: row.get(14)?,
    })
}

pub async fn insert_contact(
    conn: AsyncDbConnection,
    request: &CreateContactRequest,
) -> Result<Contact> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let mut tag_list = request.tags.clone();
    dedupe_tags(&mut tag_list);
    let tags = tags_to_json(&tag_list)?;

    let id: i64 = conn.query_row(
        "INSERT INTO contacts
         (first_name, last_name, email, phone, company, position, address, notes, tags,
          category, is_favorite, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, false, ?11, ?12)
         RETURNING id",
        params![
            request.first_name,
            request.last_name,
            request.email,
            request.phone,
            request.company,
            request.position,
            request.address,
            request.notes,
            tags,
            request.category.as_str(),
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(Contact {
        id,
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        company: request.company.clone(),
        position: request.position.clone(),
        address: request.address.clone(),
        notes: request.notes.clone(),
        tags: tag_list,
        category: request.category,
        is_favorite: false,
        created_at: now,
        updated_at: now,
        last_contacted_at: None,
    })
}

pub async fn get_contact(conn: AsyncDbConnection, id: i64) -> Result<Option<Contact>> {
    let conn = conn.lock().await?;

    let contact = conn
        .query_row(
            &format!("SELECT {} FROM contacts WHERE id = ?1", CONTACT_COLUMNS),
            [id],
            contact_from_row,
        )
        .optional()
        .map_err(|e| anyhow::anyhow!("Failed to get contact: {}", e))?;

    Ok(contact)
}

pub async fn list_contacts(
    conn: AsyncDbConnection,
    limit: usize,
    offset: usize,
) -> Result<Vec<Contact>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts ORDER BY first_name COLLATE NOCASE, last_name COLLATE NOCASE, id
            LIMIT ?1 OFFSET ?2",
        CONTACT_COLUMNS
    ))?;

    let rows = stmt.query_map(params![limit as i64, offset as i64], contact_from_row)?;
    Ok(collect_valid(rows, "contacts"))
}

/// Flips the favourite flag in a single statement so concurrent toggles never
/// overwrite each other. Returns `None` when no contact has that id.
pub async fn toggle_favorite(conn: AsyncDbConnection, id: i64) -> Result<Option<Contact>> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let contact = conn
        .query_row(
            &format!(
                "UPDATE contacts SET is_favorite = NOT is_favorite, updated_at = ?1
                 WHERE id = ?2
                 RETURNING {}",
                CONTACT_COLUMNS
            ),
            params![now, id],
            contact_from_row,
        )
        .optional()?;

    Ok(contact)
}

pub async fn count_contacts(conn: AsyncDbConnection) -> Result<i64> {
    let conn = conn.lock().await?;
    Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?)
}
