//! Wire protocol for the `/admin/orders/connect` feed.
//!
//! Every frame is a tagged object: `{"type": <string>, "data": <object>}`.
//! Inbound frames are decoded through an explicit tag-dispatch so that
//! discriminators this client does not know about are skipped instead of
//! failing the whole connection. Older clients keep working when the server
//! grows new event types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{prelude::*, types::OrderedProductStatus, types::SessionStatus, Error};

/// Payload of an `ORDER_OK` event: a new ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub id: Uuid,
    pub product_id: Uuid,
    pub session_id: Uuid,
    pub status: OrderedProductStatus,
}

/// Payload of a `DELETE_ORDERED_PRODUCT_OK` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletedOrder {
    pub id: Uuid,
}

/// Payload of an `UPDATE_SESSION_OK` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChange {
    pub id: Uuid,
    pub table_number: u32,
    pub status: SessionStatus,
}

/// Payload of a `PAY_OK` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionPaid {
    pub id: Uuid,
}

/// A decoded inbound event from the order feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    /// A new ordered product was placed.
    Order(NewOrder),
    /// An ordered product was deleted (confirmation of our own request or
    /// another actor's).
    Delete(DeletedOrder),
    /// An order session changed table number or status.
    UpdateSession(SessionChange),
    /// An order session was paid; its ordered products are gone server-side.
    SessionPaid(SessionPaid),
}

#[derive(Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    data: Value,
}

/// Decode one inbound text frame.
///
/// Returns `Ok(None)` for unknown discriminators. Malformed JSON or a
/// malformed payload for a known discriminator is an error the caller may
/// log and drop without tearing down the connection.
pub fn decode_event(text: &str) -> Result<Option<OrderEvent>> {
    let frame: Frame =
        serde_json::from_str(text).map_err(|e| Error::Decode(e.to_string()))?;

    let event = match frame.kind.as_str() {
        "ORDER_OK" => OrderEvent::Order(
            serde_json::from_value(frame.data).map_err(|e| Error::Decode(e.to_string()))?,
        ),
        "DELETE_ORDERED_PRODUCT_OK" => OrderEvent::Delete(
            serde_json::from_value(frame.data).map_err(|e| Error::Decode(e.to_string()))?,
        ),
        "UPDATE_SESSION_OK" => OrderEvent::UpdateSession(
            serde_json::from_value(frame.data).map_err(|e| Error::Decode(e.to_string()))?,
        ),
        "PAY_OK" => OrderEvent::SessionPaid(
            serde_json::from_value(frame.data).map_err(|e| Error::Decode(e.to_string()))?,
        ),
        _ => return Ok(None),
    };
    Ok(Some(event))
}

/// Outbound messages sent on the order feed.
///
/// These are fire-and-forget requests; the actual state change arrives later
/// as the corresponding inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OutgoingMessage {
    #[serde(rename = "DELETE_ORDERED_PRODUCT")]
    DeleteOrderedProduct { id: Uuid },
    #[serde(rename = "UPDATE_ORDERED_PRODUCT")]
    UpdateOrderedProduct {
        id: Uuid,
        status: OrderedProductStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_order_event() {
        let raw = r#"{
            "type": "ORDER_OK",
            "data": {
                "id": "a3bb189e-8bf9-3888-9912-ace4e6543002",
                "productId": "b3bb189e-8bf9-3888-9912-ace4e6543002",
                "sessionId": "c3bb189e-8bf9-3888-9912-ace4e6543002",
                "status": "pending"
            }
        }"#;
        let event = decode_event(raw).unwrap().unwrap();
        match event {
            OrderEvent::Order(order) => {
                assert_eq!(order.status, OrderedProductStatus::Pending);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_pay_event() {
        let raw = r#"{"type": "PAY_OK", "data": {"id": "a3bb189e-8bf9-3888-9912-ace4e6543002"}}"#;
        let event = decode_event(raw).unwrap().unwrap();
        assert!(matches!(event, OrderEvent::SessionPaid(_)));
    }

    #[test]
    fn test_unknown_discriminator_is_skipped() {
        let raw = r#"{"type": "KITCHEN_NOTE_OK", "data": {"note": "no onions"}}"#;
        assert_eq!(decode_event(raw).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let raw = r#"{"type": "PAY_OK", "data": {"id": 42}}"#;
        assert!(decode_event(raw).is_err());
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        assert!(decode_event("not json").is_err());
    }

    #[test]
    fn test_outgoing_delete_shape() {
        let id = Uuid::parse_str("a3bb189e-8bf9-3888-9912-ace4e6543002").unwrap();
        let wire = serde_json::to_string(&OutgoingMessage::DeleteOrderedProduct { id }).unwrap();
        assert_eq!(
            wire,
            r#"{"type":"DELETE_ORDERED_PRODUCT","data":{"id":"a3bb189e-8bf9-3888-9912-ace4e6543002"}}"#
        );
    }

    #[test]
    fn test_outgoing_status_change_shape() {
        let id = Uuid::parse_str("a3bb189e-8bf9-3888-9912-ace4e6543002").unwrap();
        let wire = serde_json::to_string(&OutgoingMessage::UpdateOrderedProduct {
            id,
            status: OrderedProductStatus::Preparing,
        })
        .unwrap();
        assert!(wire.starts_with(r#"{"type":"UPDATE_ORDERED_PRODUCT""#));
        assert!(wire.contains(r#""status":"preparing""#));
    }
}
