//! Call monitor: rejects calls, answers the caller and logs the missed call.

use std::sync::Arc;

use database::models::CALL_SETTING_DISABLED;
use database::{NewMessage, TicketStatus, TicketUpdate};
use tracing::{debug, info, warn};
use wa_session::{handler, CallOffer, ContactUpsert, EventSource, Session};

use crate::clock::{Clock, SystemClock};
use crate::config::MonitorConfig;
use crate::contacts::ContactSync;
use crate::debounce::Debouncer;
use crate::error::{MonitorError, Result};
use crate::reporter::{ErrorReporter, TracingReporter};
use crate::store::CallStore;

/// Result of handling one call batch.
#[derive(Debug)]
pub enum CallOutcome {
    /// Nothing was done (empty batch, calls allowed, ...).
    Ignored { reason: String },
    /// The call was rejected and the missed-call action scheduled under `key`.
    Rejected { call_id: String, key: String },
    /// A collaborator failed. The error has already been reported.
    Error(MonitorError),
}

/// Result of one debounced missed-call action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissedCallOutcome {
    /// Ticket updated and call log stored.
    Recorded { ticket_id: i64, reopened: bool },
    /// No contact with the caller's number.
    NoContact,
    /// The contact has no ticket on this connection.
    NoTicket,
}

/// Debounce key of a call: its digits read as a number.
///
/// Leading zeros are dropped and an ID without digits maps to `"0"`.
pub fn call_debounce_key(call_id: &str) -> String {
    let digits: String = call_id.chars().filter(|c| c.is_ascii_digit()).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Phone number part of a JID: everything before the first `:`.
///
/// A JID without a device suffix is returned whole.
pub fn phone_number_from_jid(from: &str) -> &str {
    from.split(':').next().unwrap_or(from)
}

/// Body of a missed-call log entry. Minutes are not zero-padded.
pub fn missed_call_body(hour: u32, minute: u32) -> String {
    format!("Chamada de voz/vídeo perdida às {}:{}", hour, minute)
}

/// Watches one WhatsApp connection for calls and contact syncs.
///
/// Clones share the same collaborators and debounce registry.
#[derive(Clone)]
pub struct CallMonitor {
    session: Arc<dyn Session>,
    store: Arc<dyn CallStore>,
    contact_sync: Arc<dyn ContactSync>,
    reporter: Arc<dyn ErrorReporter>,
    clock: Arc<dyn Clock>,
    debouncer: Debouncer<String>,
    config: MonitorConfig,
}

impl CallMonitor {
    /// Create a monitor with the tracing reporter, the system clock and a
    /// fresh debounce registry.
    pub fn new(
        session: Arc<dyn Session>,
        store: Arc<dyn CallStore>,
        contact_sync: Arc<dyn ContactSync>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            session,
            store,
            contact_sync,
            reporter: Arc::new(TracingReporter),
            clock: Arc::new(SystemClock),
            debouncer: Debouncer::new(),
            config,
        }
    }

    /// Replace the error reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the clock used for missed-call timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a shared debounce registry.
    pub fn with_debouncer(mut self, debouncer: Debouncer<String>) -> Self {
        self.debouncer = debouncer;
        self
    }

    /// The debounce registry of this monitor.
    pub fn debouncer(&self) -> &Debouncer<String> {
        &self.debouncer
    }

    /// The monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Register the call and contact handlers on an event source.
    ///
    /// Handlers live as long as the source; the monitor does no cleanup.
    pub fn attach(&self, source: &dyn EventSource) {
        let monitor = self.clone();
        source.on_call(handler(move |calls: Vec<CallOffer>| {
            let monitor = monitor.clone();
            async move {
                monitor.handle_calls(calls).await;
            }
        }));

        let monitor = self.clone();
        source.on_contacts_upsert(handler(move |contacts: Vec<ContactUpsert>| {
            let monitor = monitor.clone();
            async move {
                monitor.handle_contacts_upsert(contacts).await;
            }
        }));

        info!(
            "Call monitor attached to whatsapp {} (company {})",
            self.session.id(),
            self.config.company_id
        );
    }

    /// Handle an incoming call batch. Never fails; errors are reported.
    pub async fn handle_calls(&self, calls: Vec<CallOffer>) -> CallOutcome {
        match self.try_handle_calls(calls).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.reporter.capture("Error handling call", &e);
                CallOutcome::Error(e)
            }
        }
    }

    async fn try_handle_calls(&self, calls: Vec<CallOffer>) -> Result<CallOutcome> {
        // Only the first call of a batch is acted on.
        let Some(call) = calls.into_iter().next() else {
            return Ok(CallOutcome::Ignored {
                reason: "empty call batch".to_string(),
            });
        };

        let setting = self.store.call_setting(self.config.company_id).await?;
        if setting.as_deref() != Some(CALL_SETTING_DISABLED) {
            debug!("Calls enabled, ignoring call {}", call.id);
            return Ok(CallOutcome::Ignored {
                reason: "calls are enabled".to_string(),
            });
        }

        self.session.reject_call(&call.id, &call.from).await?;
        info!("Rejected call {} from {}", call.id, call.from);

        let key = call_debounce_key(&call.id);
        let monitor = self.clone();
        let call_id = call.id.clone();
        self.debouncer
            .trigger(key.clone(), self.config.debounce_delay, move || async move {
                monitor.run_missed_call(call).await;
            });

        Ok(CallOutcome::Rejected { call_id, key })
    }

    /// The debounced part of call handling. Never fails; errors are reported.
    async fn run_missed_call(&self, call: CallOffer) {
        if let Err(e) = self.record_missed_call(&call).await {
            self.reporter.capture("Error handling call", &e);
        }
    }

    /// Answer the caller and log the missed call on their ticket, in order.
    pub async fn record_missed_call(&self, call: &CallOffer) -> Result<MissedCallOutcome> {
        let company_id = self.config.company_id;

        self.session
            .send_text(&call.from, &self.config.reject_message)
            .await?;

        let number = phone_number_from_jid(&call.from);
        let Some(contact) = self.store.find_contact(company_id, number).await? else {
            debug!("No contact for caller {}, nothing recorded", call.from);
            return Ok(MissedCallOutcome::NoContact);
        };

        let Some(ticket) = self
            .store
            .find_ticket(contact.id, self.session.id(), company_id)
            .await?
        else {
            debug!("No ticket for caller {}, nothing recorded", call.from);
            return Ok(MissedCallOutcome::NoTicket);
        };

        let (hour, minute) = self.clock.hour_minute();
        let body = missed_call_body(hour, minute);

        let reopened = ticket.status == TicketStatus::Closed;
        let update = TicketUpdate {
            last_message: Some(body.clone()),
            status: reopened.then_some(TicketStatus::Pending),
        };
        self.store.update_ticket(ticket.id, &update).await?;

        let message = NewMessage::call_log(call.id.clone(), ticket.id, contact.id, body);
        self.store.create_message(company_id, &message).await?;

        info!(
            "Logged missed call {} on ticket {}{}",
            call.id,
            ticket.id,
            if reopened { " (reopened)" } else { "" }
        );

        Ok(MissedCallOutcome::Recorded {
            ticket_id: ticket.id,
            reopened,
        })
    }

    /// Forward a contact upsert batch unchanged. Never fails; errors are reported.
    pub async fn handle_contacts_upsert(&self, contacts: Vec<ContactUpsert>) -> Option<usize> {
        let whatsapp_id = self.session.id();
        let count = contacts.len();

        match self.contact_sync.sync(whatsapp_id, contacts).await {
            Ok(applied) => {
                debug!("Synced {} contacts on whatsapp {}", applied, whatsapp_id);
                Some(applied)
            }
            Err(e) => {
                warn!("Contact sync of {} entries failed", count);
                self.reporter.capture("Error syncing contacts", &e);
                None
            }
        }
    }
}

impl std::fmt::Debug for CallMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallMonitor")
            .field("whatsapp_id", &self.session.id())
            .field("config", &self.config)
            .field("debouncer", &self.debouncer)
            .finish()
    }
}
