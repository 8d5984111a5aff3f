//! Integration tests for the call monitor.
//!
//! Most tests run against an in-memory store with tokio's clock paused, so the
//! debounce window elapses instantly once the test sleeps past it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use call_monitor::{
    CallMonitor, CallOutcome, CallStore, ContactSync, ErrorReporter, FixedClock, MissedCallOutcome,
    MonitorConfig, MonitorError, DEFAULT_REJECT_MESSAGE,
};
use database::models::CALL_LOG_MEDIA_TYPE;
use database::{Contact, DatabaseError, NewMessage, Ticket, TicketStatus, TicketUpdate};
use mock_session::{DelayedSession, FakeSession, RejectedCall};
use tokio::time::sleep;
use wa_session::{CallOffer, ContactUpsert, EventEmitter, SessionEvent};

const COMPANY_ID: i64 = 1;
const WHATSAPP_ID: i64 = 3;
const WINDOW: Duration = Duration::from_millis(3000);
const CALLER: &str = "551199999999:1@s.whatsapp.net";

// ============================================================================
// Test collaborators
// ============================================================================

#[derive(Default)]
struct StoreState {
    call_setting: Option<String>,
    contacts: Vec<Contact>,
    tickets: Vec<Ticket>,
    messages: Vec<(i64, NewMessage)>,
}

#[derive(Default)]
struct MemoryStore {
    state: Mutex<StoreState>,
    fail_setting: AtomicBool,
}

impl MemoryStore {
    fn with_setting(value: &str) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().call_setting = Some(value.to_string());
        store
    }

    fn add_contact(&self, id: i64, number: &str) {
        self.state.lock().unwrap().contacts.push(Contact {
            id,
            company_id: COMPANY_ID,
            number: number.to_string(),
            name: String::new(),
        });
    }

    fn add_ticket(&self, id: i64, contact_id: i64, status: TicketStatus) {
        self.state.lock().unwrap().tickets.push(Ticket {
            id,
            contact_id,
            whatsapp_id: WHATSAPP_ID,
            company_id: COMPANY_ID,
            status,
            last_message: String::new(),
        });
    }

    fn ticket(&self, id: i64) -> Ticket {
        self.state
            .lock()
            .unwrap()
            .tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .unwrap()
    }

    fn messages(&self) -> Vec<(i64, NewMessage)> {
        self.state.lock().unwrap().messages.clone()
    }
}

#[async_trait]
impl CallStore for MemoryStore {
    async fn call_setting(&self, company_id: i64) -> Result<Option<String>, DatabaseError> {
        if self.fail_setting.load(Ordering::SeqCst) {
            return Err(DatabaseError::NotFound {
                entity: "Setting",
                id: company_id.to_string(),
            });
        }
        Ok(self.state.lock().unwrap().call_setting.clone())
    }

    async fn find_contact(
        &self,
        company_id: i64,
        number: &str,
    ) -> Result<Option<Contact>, DatabaseError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .contacts
            .iter()
            .find(|c| c.company_id == company_id && c.number == number)
            .cloned())
    }

    async fn find_ticket(
        &self,
        contact_id: i64,
        whatsapp_id: i64,
        company_id: i64,
    ) -> Result<Option<Ticket>, DatabaseError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .tickets
            .iter()
            .find(|t| {
                t.contact_id == contact_id
                    && t.whatsapp_id == whatsapp_id
                    && t.company_id == company_id
            })
            .cloned())
    }

    async fn update_ticket(
        &self,
        ticket_id: i64,
        update: &TicketUpdate,
    ) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().unwrap();
        let ticket = state
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "Ticket",
                id: ticket_id.to_string(),
            })?;
        if let Some(ref body) = update.last_message {
            ticket.last_message = body.clone();
        }
        if let Some(status) = update.status {
            ticket.status = status;
        }
        Ok(())
    }

    async fn create_message(
        &self,
        company_id: i64,
        message: &NewMessage,
    ) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().unwrap();
        if state.messages.iter().any(|(_, m)| m.id == message.id) {
            return Err(DatabaseError::AlreadyExists {
                entity: "Message",
                id: message.id.clone(),
            });
        }
        state.messages.push((company_id, message.clone()));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSync {
    batches: Mutex<Vec<(i64, Vec<ContactUpsert>)>>,
    fail: AtomicBool,
}

#[async_trait]
impl ContactSync for RecordingSync {
    async fn sync(
        &self,
        whatsapp_id: i64,
        contacts: Vec<ContactUpsert>,
    ) -> Result<usize, MonitorError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MonitorError::Database(DatabaseError::NotFound {
                entity: "Whatsapp",
                id: whatsapp_id.to_string(),
            }));
        }
        let count = contacts.len();
        self.batches.lock().unwrap().push((whatsapp_id, contacts));
        Ok(count)
    }
}

#[derive(Default)]
struct RecordingReporter {
    captured: Mutex<Vec<String>>,
}

impl RecordingReporter {
    fn count(&self) -> usize {
        self.captured.lock().unwrap().len()
    }
}

impl ErrorReporter for RecordingReporter {
    fn capture(&self, context: &str, error: &MonitorError) {
        self.captured
            .lock()
            .unwrap()
            .push(format!("{}: {}", context, error));
    }
}

struct Harness {
    session: FakeSession,
    store: Arc<MemoryStore>,
    sync: Arc<RecordingSync>,
    reporter: Arc<RecordingReporter>,
    monitor: CallMonitor,
}

fn harness(store: MemoryStore) -> Harness {
    let session = FakeSession::new(WHATSAPP_ID);
    let store = Arc::new(store);
    let sync = Arc::new(RecordingSync::default());
    let reporter = Arc::new(RecordingReporter::default());

    let monitor = CallMonitor::new(
        Arc::new(session.clone()),
        store.clone(),
        sync.clone(),
        MonitorConfig::new(COMPANY_ID).with_debounce_delay(WINDOW),
    )
    .with_reporter(reporter.clone())
    .with_clock(Arc::new(FixedClock::new(9, 5)));

    Harness {
        session,
        store,
        sync,
        reporter,
        monitor,
    }
}

/// Disabled calls, contact 42 and closed ticket 7.
fn scenario_store() -> MemoryStore {
    let store = MemoryStore::with_setting("disabled");
    store.add_contact(42, "551199999999");
    store.add_ticket(7, 42, TicketStatus::Closed);
    store
}

/// Deliver a single call offer from the test caller.
async fn ring(monitor: &CallMonitor, call_id: &str) -> CallOutcome {
    let calls = vec![CallOffer::new(call_id, CALLER)];
    monitor.handle_calls(calls).await
}

async fn elapse_window() {
    sleep(WINDOW + Duration::from_millis(10)).await;
}

// ============================================================================
// Call handling
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_missed_call_scenario() {
    let h = harness(scenario_store());

    let outcome = ring(&h.monitor, "ABC123").await;
    match outcome {
        CallOutcome::Rejected { call_id, key } => {
            assert_eq!(call_id, "ABC123");
            assert_eq!(key, "123");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(
        h.session.rejected(),
        vec![RejectedCall {
            call_id: "ABC123".to_string(),
            from: CALLER.to_string(),
        }]
    );
    // Nothing happens before the window elapses
    assert!(h.session.sent().is_empty());
    assert!(h.store.messages().is_empty());

    elapse_window().await;

    let sent = h.session.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, CALLER);
    assert_eq!(sent[0].text, DEFAULT_REJECT_MESSAGE);

    let ticket = h.store.ticket(7);
    assert_eq!(ticket.status, TicketStatus::Pending);
    assert_eq!(ticket.last_message, "Chamada de voz/vídeo perdida às 9:5");

    let messages = h.store.messages();
    assert_eq!(messages.len(), 1);
    let (company_id, message) = &messages[0];
    assert_eq!(*company_id, COMPANY_ID);
    assert_eq!(message.id, "ABC123");
    assert_eq!(message.ticket_id, 7);
    assert_eq!(message.contact_id, 42);
    assert_eq!(message.body, "Chamada de voz/vídeo perdida às 9:5");
    assert_eq!(message.media_type, CALL_LOG_MEDIA_TYPE);
    assert_eq!(message.ack, 1);
    assert!(message.read);
    assert!(!message.from_me);
    assert!(message.quoted_msg_id.is_none());

    assert_eq!(h.reporter.count(), 0);
    assert_eq!(h.monitor.debouncer().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_enabled_setting_takes_no_action() {
    for setting in [Some("enabled"), Some("whatever"), None] {
        let store = match setting {
            Some(value) => MemoryStore::with_setting(value),
            None => MemoryStore::default(),
        };
        store.add_contact(42, "551199999999");
        store.add_ticket(7, 42, TicketStatus::Closed);
        let h = harness(store);

        let outcome = ring(&h.monitor, "ABC123").await;
        assert!(matches!(outcome, CallOutcome::Ignored { .. }));
        assert_eq!(h.monitor.debouncer().pending_count(), 0);

        elapse_window().await;
        assert!(h.session.rejected().is_empty());
        assert!(h.session.sent().is_empty());
        assert!(h.store.messages().is_empty());
        assert_eq!(h.store.ticket(7).status, TicketStatus::Closed);
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_ticket_sends_reply_only() {
    let store = MemoryStore::with_setting("disabled");
    store.add_contact(42, "551199999999");
    let h = harness(store);

    ring(&h.monitor, "ABC123").await;
    elapse_window().await;

    assert_eq!(h.session.sent().len(), 1);
    assert!(h.store.messages().is_empty());
    assert_eq!(h.reporter.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_contact_sends_reply_only() {
    let h = harness(MemoryStore::with_setting("disabled"));

    let outcome = h
        .monitor
        .record_missed_call(&CallOffer::new("ABC123", CALLER))
        .await
        .unwrap();
    assert_eq!(outcome, MissedCallOutcome::NoContact);
    assert_eq!(h.session.sent().len(), 1);
    assert!(h.store.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_open_ticket_keeps_status() {
    let store = MemoryStore::with_setting("disabled");
    store.add_contact(42, "551199999999");
    store.add_ticket(7, 42, TicketStatus::Open);
    let h = harness(store);

    let outcome = h
        .monitor
        .record_missed_call(&CallOffer::new("ABC123", CALLER))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        MissedCallOutcome::Recorded {
            ticket_id: 7,
            reopened: false
        }
    );

    let ticket = h.store.ticket(7);
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.last_message, "Chamada de voz/vídeo perdida às 9:5");
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_same_call_records_once() {
    let h = harness(scenario_store());

    for _ in 0..3 {
        ring(&h.monitor, "ABC123").await;
        sleep(Duration::from_millis(400)).await;
    }
    assert_eq!(h.monitor.debouncer().pending_count(), 1);

    elapse_window().await;

    // Every event is rejected, but the follow-up runs once
    assert_eq!(h.session.rejected().len(), 3);
    assert_eq!(h.session.sent().len(), 1);
    assert_eq!(h.store.messages().len(), 1);
    assert_eq!(h.reporter.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_distinct_calls_record_independently() {
    let store = scenario_store();
    store.add_contact(43, "551188888888");
    store.add_ticket(8, 43, TicketStatus::Pending);
    let h = harness(store);

    ring(&h.monitor, "CALL1").await;
    let other = vec![CallOffer::new("CALL2", "551188888888:4@s.whatsapp.net")];
    h.monitor.handle_calls(other).await;
    assert_eq!(h.monitor.debouncer().pending_count(), 2);

    elapse_window().await;

    let mut ids: Vec<String> = h.store.messages().into_iter().map(|(_, m)| m.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["CALL1".to_string(), "CALL2".to_string()]);
    assert_eq!(h.store.ticket(8).status, TicketStatus::Pending);
}

#[tokio::test(start_paused = true)]
async fn test_only_first_call_of_batch_is_handled() {
    let h = harness(scenario_store());

    h.monitor
        .handle_calls(vec![
            CallOffer::new("ABC123", CALLER),
            CallOffer::new("XYZ789", "551177777777:1@s.whatsapp.net"),
        ])
        .await;
    elapse_window().await;

    assert_eq!(h.session.rejected().len(), 1);
    assert_eq!(h.session.rejected()[0].call_id, "ABC123");
    assert_eq!(h.store.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_batch_is_ignored() {
    let h = harness(scenario_store());

    let outcome = h.monitor.handle_calls(Vec::new()).await;
    assert!(matches!(outcome, CallOutcome::Ignored { .. }));
    assert!(h.session.rejected().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_session_still_sequenced() {
    let store = Arc::new(scenario_store());
    let fake = FakeSession::new(WHATSAPP_ID);
    let monitor = CallMonitor::new(
        Arc::new(DelayedSession::with_millis(fake.clone(), 500)),
        store.clone(),
        Arc::new(RecordingSync::default()),
        MonitorConfig::new(COMPANY_ID).with_debounce_delay(WINDOW),
    )
    .with_clock(Arc::new(FixedClock::new(23, 59)));

    ring(&monitor, "ABC123").await;
    // Rejection completed before the debounce was scheduled
    assert_eq!(fake.rejected().len(), 1);
    assert!(monitor.debouncer().is_pending(&"123".to_string()));

    sleep(WINDOW + Duration::from_secs(1)).await;
    assert_eq!(fake.sent().len(), 1);
    assert_eq!(
        store.ticket(7).last_message,
        "Chamada de voz/vídeo perdida às 23:59"
    );
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_errors_do_not_break_subscription() {
    let h = harness(scenario_store());
    let emitter = EventEmitter::new();
    h.monitor.attach(&emitter);

    // Rejection fails: reported, nothing scheduled
    h.session.fail_reject(true);
    for task in emitter.emit(SessionEvent::Call(vec![CallOffer::new("ABC123", CALLER)])) {
        task.await.unwrap();
    }
    assert_eq!(h.reporter.count(), 1);
    assert_eq!(h.monitor.debouncer().pending_count(), 0);

    // Setting lookup fails: reported as well
    h.session.fail_reject(false);
    h.store.fail_setting.store(true, Ordering::SeqCst);
    for task in emitter.emit(SessionEvent::Call(vec![CallOffer::new("ABC123", CALLER)])) {
        task.await.unwrap();
    }
    assert_eq!(h.reporter.count(), 2);

    // The same subscription still handles the next call
    h.store.fail_setting.store(false, Ordering::SeqCst);
    for task in emitter.emit(SessionEvent::Call(vec![CallOffer::new("ABC123", CALLER)])) {
        task.await.unwrap();
    }
    elapse_window().await;

    assert_eq!(h.session.rejected().len(), 1);
    assert_eq!(h.store.messages().len(), 1);
    assert_eq!(h.reporter.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failure_inside_debounced_action_is_reported() {
    let h = harness(scenario_store());
    h.session.fail_send(true);

    let outcome = ring(&h.monitor, "ABC123").await;
    assert!(matches!(outcome, CallOutcome::Rejected { .. }));

    elapse_window().await;

    assert_eq!(h.reporter.count(), 1);
    assert!(h.store.messages().is_empty());
    assert_eq!(h.store.ticket(7).status, TicketStatus::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_call_log_is_reported() {
    let h = harness(scenario_store());

    ring(&h.monitor, "ABC123").await;
    elapse_window().await;
    // Same call ID in a later window collides with the stored message
    ring(&h.monitor, "ABC123").await;
    elapse_window().await;

    assert_eq!(h.session.sent().len(), 2);
    assert_eq!(h.store.messages().len(), 1);
    assert_eq!(h.reporter.count(), 1);
    let captured = h.reporter.captured.lock().unwrap();
    assert!(captured[0].contains("already exists"));
}

// ============================================================================
// Contact upsert forwarding
// ============================================================================

#[tokio::test]
async fn test_contacts_upsert_forwarded_unchanged() {
    let h = harness(MemoryStore::default());
    let emitter = EventEmitter::new();
    h.monitor.attach(&emitter);

    let batch = vec![
        ContactUpsert {
            id: "551100000001@s.whatsapp.net".to_string(),
            name: Some("Ana".to_string()),
            notify: None,
        },
        ContactUpsert {
            id: "551100000001@s.whatsapp.net".to_string(),
            name: None,
            notify: Some("Ana".to_string()),
        },
    ];
    for task in emitter.emit(SessionEvent::ContactsUpsert(batch.clone())) {
        task.await.unwrap();
    }

    let batches = h.sync.batches.lock().unwrap().clone();
    assert_eq!(batches, vec![(WHATSAPP_ID, batch)]);
}

#[tokio::test]
async fn test_contacts_upsert_failure_is_reported() {
    let h = harness(MemoryStore::default());
    h.sync.fail.store(true, Ordering::SeqCst);

    let applied = h
        .monitor
        .handle_contacts_upsert(vec![ContactUpsert::default()])
        .await;
    assert!(applied.is_none());
    assert_eq!(h.reporter.count(), 1);
}

// ============================================================================
// SQLite-backed store
// ============================================================================

#[tokio::test]
async fn test_missed_call_against_sqlite() {
    use call_monitor::{DatabaseContactSync, SqliteCallStore};
    use database::models::{CALL_SETTING_DISABLED, CALL_SETTING_KEY};
    use database::{contact, message, session_contact, setting, ticket, Database};

    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    let pool = db.pool();

    setting::upsert_setting(pool, COMPANY_ID, CALL_SETTING_KEY, CALL_SETTING_DISABLED)
        .await
        .unwrap();
    let contact_id = contact::create_contact(pool, COMPANY_ID, "551199999999", "Maria")
        .await
        .unwrap();
    let closed = TicketStatus::Closed;
    let ticket_id = ticket::create_ticket(pool, contact_id, WHATSAPP_ID, COMPANY_ID, closed)
        .await
        .unwrap();

    let session = FakeSession::new(WHATSAPP_ID);
    let reporter = Arc::new(RecordingReporter::default());
    let window = Duration::from_millis(50);
    let monitor = CallMonitor::new(
        Arc::new(session.clone()),
        Arc::new(SqliteCallStore::new(db.clone())),
        Arc::new(DatabaseContactSync::new(db.clone())),
        MonitorConfig::new(COMPANY_ID).with_debounce_delay(window),
    )
    .with_reporter(reporter.clone())
    .with_clock(Arc::new(FixedClock::new(14, 30)));

    ring(&monitor, "ABC123").await;
    ring(&monitor, "ABC123").await;

    // Wait for the debounced action to land
    let mut stored = Vec::new();
    for _ in 0..50 {
        sleep(Duration::from_millis(20)).await;
        stored = message::list_messages(pool, ticket_id).await.unwrap();
        if !stored.is_empty() {
            break;
        }
    }

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "ABC123");
    assert_eq!(stored[0].company_id, COMPANY_ID);
    assert_eq!(stored[0].body, "Chamada de voz/vídeo perdida às 14:30");
    assert_eq!(stored[0].media_type, CALL_LOG_MEDIA_TYPE);

    let ticket = ticket::get_ticket(pool, ticket_id).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Pending);
    assert_eq!(ticket.last_message, "Chamada de voz/vídeo perdida às 14:30");

    assert_eq!(session.rejected().len(), 2);
    assert_eq!(session.sent().len(), 1);
    assert_eq!(reporter.count(), 0);

    // Contact upserts land in the session contact table
    let applied = monitor
        .handle_contacts_upsert(vec![ContactUpsert {
            id: "551199999999@s.whatsapp.net".to_string(),
            name: Some("Maria".to_string()),
            notify: None,
        }])
        .await;
    assert_eq!(applied, Some(1));
    let synced = session_contact::list_contacts(pool, WHATSAPP_ID)
        .await
        .unwrap();
    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].name.as_deref(), Some("Maria"));
}
