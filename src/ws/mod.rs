mod message_types;
mod ws_client;

pub use message_types::{
    decode_event, DeletedOrder, NewOrder, OrderEvent, OutgoingMessage, SessionChange, SessionPaid,
};
pub use ws_client::{OrderFeed, OrderSocket};
