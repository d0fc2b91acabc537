use anyhow::Result;
use async_trait::async_trait;
use leadzen_core::source::{EntitySource, Page};
use shared_types::{CallLog, Contact, Lead, Note};

use crate::database::{call_logs, contacts, leads, notes, AsyncDbConnection};

/// SQLite-backed entity source for the list stores.
///
/// A source scoped to a lead only yields that lead's calls and notes; leads
/// and contacts are never scoped.
#[derive(Clone)]
pub struct DbSource {
    conn: AsyncDbConnection,
    lead_id: Option<i64>,
}

impl DbSource {
    pub fn new(conn: AsyncDbConnection) -> Self {
        Self {
            conn,
            lead_id: None,
        }
    }

    pub fn for_lead(conn: AsyncDbConnection, lead_id: Option<i64>) -> Self {
        Self { conn, lead_id }
    }
}

#[async_trait]
impl EntitySource<Lead> for DbSource {
    async fn get_entities(&self, page: Page) -> Result<Vec<Lead>> {
        leads::list_leads(self.conn.clone(), page.limit, page.offset).await
    }
}

#[async_trait]
impl EntitySource<Contact> for DbSource {
    async fn get_entities(&self, page: Page) -> Result<Vec<Contact>> {
        contacts::list_contacts(self.conn.clone(), page.limit, page.offset).await
    }
}

#[async_trait]
impl EntitySource<CallLog> for DbSource {
    async fn get_entities(&self, page: Page) -> Result<Vec<CallLog>> {
        call_logs::list_call_logs(self.conn.clone(), self.lead_id, page.limit, page.offset).await
    }
}

#[async_trait]
impl EntitySource<Note> for DbSource {
    async fn get_entities(&self, page: Page) -> Result<Vec<Note>> {
        notes::list_notes(self.conn.clone(), self.lead_id, page.limit, page.offset).await
    }
}
