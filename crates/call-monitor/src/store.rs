//! Persistence seam used by the call monitor.

use async_trait::async_trait;
use database::models::CALL_SETTING_KEY;
use database::{
    contact, message, setting, ticket, Contact, Database, DatabaseError, NewMessage, Ticket,
    TicketUpdate,
};

/// Lookups and writes the call monitor performs.
#[async_trait]
pub trait CallStore: Send + Sync {
    /// Value of the company's `call` setting, if the row exists.
    async fn call_setting(&self, company_id: i64) -> Result<Option<String>, DatabaseError>;

    /// Contact by company and phone number.
    async fn find_contact(
        &self,
        company_id: i64,
        number: &str,
    ) -> Result<Option<Contact>, DatabaseError>;

    /// Ticket of a contact on a connection.
    async fn find_ticket(
        &self,
        contact_id: i64,
        whatsapp_id: i64,
        company_id: i64,
    ) -> Result<Option<Ticket>, DatabaseError>;

    /// Apply a partial ticket update.
    async fn update_ticket(
        &self,
        ticket_id: i64,
        update: &TicketUpdate,
    ) -> Result<(), DatabaseError>;

    /// Persist a message log entry.
    async fn create_message(
        &self,
        company_id: i64,
        message: &NewMessage,
    ) -> Result<(), DatabaseError>;
}

/// [`CallStore`] backed by the SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteCallStore {
    db: Database,
}

impl SqliteCallStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CallStore for SqliteCallStore {
    async fn call_setting(&self, company_id: i64) -> Result<Option<String>, DatabaseError> {
        let record = setting::get_setting(self.db.pool(), company_id, CALL_SETTING_KEY).await?;
        Ok(record.map(|s| s.value))
    }

    async fn find_contact(
        &self,
        company_id: i64,
        number: &str,
    ) -> Result<Option<Contact>, DatabaseError> {
        contact::find_contact(self.db.pool(), company_id, number).await
    }

    async fn find_ticket(
        &self,
        contact_id: i64,
        whatsapp_id: i64,
        company_id: i64,
    ) -> Result<Option<Ticket>, DatabaseError> {
        ticket::find_ticket(self.db.pool(), contact_id, whatsapp_id, company_id).await
    }

    async fn update_ticket(
        &self,
        ticket_id: i64,
        update: &TicketUpdate,
    ) -> Result<(), DatabaseError> {
        ticket::update_ticket(self.db.pool(), ticket_id, update).await
    }

    async fn create_message(
        &self,
        company_id: i64,
        message: &NewMessage,
    ) -> Result<(), DatabaseError> {
        message::create_message(self.db.pool(), company_id, message).await
    }
}
