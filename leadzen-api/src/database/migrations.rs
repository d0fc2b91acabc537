use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create leads table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL,
            email VARCHAR,
            phone VARCHAR,
            company VARCHAR,
            position VARCHAR,
            source VARCHAR NOT NULL DEFAULT 'manual',
            status VARCHAR NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'contacted', 'qualified', 'proposal', 'closed_won', 'closed_lost')),
            priority VARCHAR NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high', 'urgent')),
            value REAL,
            notes VARCHAR,
            tags VARCHAR NOT NULL DEFAULT '[]',
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            last_contacted_at BIGINT,
            next_follow_up_at BIGINT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_leads_phone ON leads(phone)",
        [],
    )?;

    // Create contacts table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name VARCHAR NOT NULL,
            last_name VARCHAR NOT NULL DEFAULT '',
            email VARCHAR,
            phone VARCHAR,
            company VARCHAR,
            position VARCHAR,
            address VARCHAR,
            notes VARCHAR,
            tags VARCHAR NOT NULL DEFAULT '[]',
            category VARCHAR NOT NULL DEFAULT 'other',
            is_favorite BOOLEAN NOT NULL DEFAULT false,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            last_contacted_at BIGINT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_category ON contacts(category)",
        [],
    )?;

    // Create call_logs table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS call_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            lead_id INTEGER,
            phone_number VARCHAR NOT NULL,
            contact_name VARCHAR,
            direction VARCHAR NOT NULL CHECK (direction IN ('outbound', 'inbound', 'missed')),
            status VARCHAR NOT NULL DEFAULT 'ended',
            started_at BIGINT NOT NULL,
            ended_at BIGINT,
            duration BIGINT NOT NULL DEFAULT 0,
            notes VARCHAR,
            outcome VARCHAR,
            follow_up_required BOOLEAN NOT NULL DEFAULT false,
            tags VARCHAR NOT NULL DEFAULT '[]',
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (lead_id) REFERENCES leads (id) ON DELETE SET NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_call_logs_started ON call_logs(started_at DESC)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_call_logs_lead ON call_logs(lead_id)",
        [],
    )?;

    // Create lead_notes table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS lead_notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            lead_id INTEGER NOT NULL,
            call_log_id INTEGER,
            content VARCHAR NOT NULL,
            tag VARCHAR NOT NULL DEFAULT 'general' CHECK (tag IN ('call-related', 'general', 'follow-up', 'custom')),
            created_by VARCHAR NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (lead_id) REFERENCES leads (id) ON DELETE CASCADE,
            FOREIGN KEY (call_log_id) REFERENCES call_logs (id) ON DELETE SET NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_lead_notes_lead ON lead_notes(lead_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                    AND name IN ('leads', 'contacts', 'call_logs', 'lead_notes')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }
}
