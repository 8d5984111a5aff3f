//! Wire types exchanged with the WhatsApp bridge.

mod call;
mod contact;
mod event;
mod rpc;

pub use call::{CallOffer, CallStatus};
pub use contact::ContactUpsert;
pub use event::{SessionEvent, CALL_EVENT, CONTACTS_UPSERT_EVENT};
pub use rpc::{RejectCallParams, SendResult, SendTextParams};
