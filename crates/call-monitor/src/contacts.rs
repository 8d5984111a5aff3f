//! Contact upsert forwarding.

use async_trait::async_trait;
use database::{session_contact, Database, SessionContact};
use wa_session::ContactUpsert;

use crate::error::MonitorError;

/// Collaborator that owns contact upsert semantics.
#[async_trait]
pub trait ContactSync: Send + Sync {
    /// Apply a `contacts.upsert` batch for a connection. Returns how many
    /// entries were applied.
    async fn sync(
        &self,
        whatsapp_id: i64,
        contacts: Vec<ContactUpsert>,
    ) -> Result<usize, MonitorError>;
}

/// [`ContactSync`] that merges batches into the `session_contacts` table.
#[derive(Debug, Clone)]
pub struct DatabaseContactSync {
    db: Database,
}

impl DatabaseContactSync {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Convert a batch entry into its stored form.
pub fn to_session_contact(whatsapp_id: i64, contact: ContactUpsert) -> SessionContact {
    SessionContact {
        whatsapp_id,
        jid: contact.id,
        name: contact.name,
        notify: contact.notify,
    }
}

#[async_trait]
impl ContactSync for DatabaseContactSync {
    async fn sync(
        &self,
        whatsapp_id: i64,
        contacts: Vec<ContactUpsert>,
    ) -> Result<usize, MonitorError> {
        let rows: Vec<SessionContact> = contacts
            .into_iter()
            .map(|c| to_session_contact(whatsapp_id, c))
            .collect();

        let pool = self.db.pool();
        let applied = session_contact::upsert_contacts(pool, whatsapp_id, &rows).await?;
        Ok(applied)
    }
}
