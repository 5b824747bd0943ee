//! Webhook normalizer - Extracts inbound messages from platform payloads
//!
//! Payloads follow the WhatsApp Cloud API notification shape,
//! `entry[0].changes[0].value.messages[0]`. Every level is optional: a
//! delivery receipt or a partial payload simply yields no event.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::InboundEvent;

/// Location of the first message in a notification
const FIRST_MESSAGE: &str = "/entry/0/changes/0/value/messages/0";

#[derive(Debug, Deserialize)]
struct WebhookMessage {
    from: Option<String>,
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<TextBody>,
}

#[derive(Debug, Deserialize)]
struct TextBody {
    body: Option<String>,
}

/// Null, false, zero and empty values count as absent
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Extract the first message of a payload, text-typed or not.
///
/// Only `object` and the first message are read; the rest of the payload
/// may be malformed without affecting the result.
pub fn extract_message(payload: &Value) -> Option<InboundEvent> {
    if !payload.get("object").is_some_and(is_present) {
        return None;
    }

    let node = payload.pointer(FIRST_MESSAGE)?;
    let message: WebhookMessage = match serde_json::from_value(node.clone()) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!("Ignoring webhook message with unexpected shape: {}", e);
            return None;
        }
    };

    let sender_id = message.from.filter(|f| !f.is_empty())?;
    let is_text = message.kind.as_deref().map_or(true, |k| k == "text");
    let text = message
        .text
        .and_then(|t| t.body)
        .filter(|body| is_text && !body.is_empty());

    Some(InboundEvent {
        sender_id,
        text,
        message_id: message.id,
    })
}

/// Extract an actionable text message, if the payload carries one
pub fn normalize(payload: &Value) -> Option<InboundEvent> {
    extract_message(payload).filter(InboundEvent::is_processable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_payload(from: &str, body: &str) -> Value {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "WABA_ID",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": { "display_phone_number": "15550000000", "phone_number_id": "123" },
                        "messages": [{
                            "from": from,
                            "id": "wamid.abc",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": { "body": body }
                        }]
                    }
                }]
            }]
        })
    }

    #[test]
    fn test_text_message_is_extracted() {
        let event = normalize(&text_payload("33612345678", "!echo hi")).unwrap();
        assert_eq!(event.sender_id, "33612345678");
        assert_eq!(event.text.as_deref(), Some("!echo hi"));
        assert_eq!(event.message_id.as_deref(), Some("wamid.abc"));
    }

    #[test]
    fn test_missing_entry_yields_nothing() {
        assert!(normalize(&json!({ "object": "whatsapp_business_account" })).is_none());
        assert!(normalize(&json!({})).is_none());
        assert!(normalize(&json!(null)).is_none());
        assert!(normalize(&json!("text")).is_none());
    }

    #[test]
    fn test_missing_intermediate_levels_yield_nothing() {
        let payloads = [
            json!({ "object": "x", "entry": [] }),
            json!({ "object": "x", "entry": [{}] }),
            json!({ "object": "x", "entry": [{ "changes": [] }] }),
            json!({ "object": "x", "entry": [{ "changes": [{}] }] }),
            json!({ "object": "x", "entry": [{ "changes": [{ "value": {} }] }] }),
            json!({ "object": "x", "entry": [{ "changes": [{ "value": { "messages": [] } }] }] }),
        ];
        for payload in payloads {
            assert!(extract_message(&payload).is_none(), "{payload}");
        }
    }

    #[test]
    fn test_status_update_yields_nothing() {
        let payload = json!({
            "object": "whatsapp_business_account",
            "entry": [{ "changes": [{ "value": {
                "statuses": [{ "id": "wamid.abc", "status": "delivered" }]
            }}]}]
        });
        assert!(normalize(&payload).is_none());
    }

    #[test]
    fn test_non_text_message_yields_no_event() {
        let payload = json!({
            "object": "whatsapp_business_account",
            "entry": [{ "changes": [{ "value": { "messages": [{
                "from": "33612345678",
                "id": "wamid.img",
                "type": "image",
                "image": { "id": "media-1", "mime_type": "image/jpeg" }
            }]}}]}]
        });
        assert!(normalize(&payload).is_none());

        let message = extract_message(&payload).unwrap();
        assert_eq!(message.sender_id, "33612345678");
        assert!(!message.is_processable());
    }

    #[test]
    fn test_empty_body_or_missing_sender_yields_nothing() {
        assert!(normalize(&text_payload("33612345678", "")).is_none());

        let mut payload = text_payload("33612345678", "hi");
        payload["entry"][0]["changes"][0]["value"]["messages"][0]
            .as_object_mut()
            .unwrap()
            .remove("from");
        assert!(normalize(&payload).is_none());
    }

    #[test]
    fn test_missing_object_yields_nothing() {
        let mut payload = text_payload("33612345678", "hi");
        payload.as_object_mut().unwrap().remove("object");
        assert!(normalize(&payload).is_none());
    }

    #[test]
    fn test_malformed_siblings_do_not_hide_first_message() {
        let mut payload = text_payload("336", "!echo hi");
        payload["entry"][0]["changes"][0]["value"]["messages"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "from": 42, "text": { "body": 5 } }));
        payload["entry"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "changes": "x" }));
        payload["entry"][0]["changes"][0]["value"]["metadata"] = json!(7);

        let event = normalize(&payload).unwrap();
        assert_eq!(event.sender_id, "336");
        assert_eq!(event.text.as_deref(), Some("!echo hi"));
    }

    #[test]
    fn test_object_must_be_truthy() {
        for object in [json!(null), json!(""), json!(false), json!(0), json!({})] {
            let mut payload = text_payload("336", "hi");
            payload["object"] = object;
            assert!(normalize(&payload).is_none());
        }

        let mut payload = text_payload("336", "hi");
        payload["object"] = json!(true);
        assert!(normalize(&payload).is_some());
    }

    #[test]
    fn test_wrong_field_types_yield_nothing() {
        let payload = json!({ "object": "x", "entry": { "changes": "nope" } });
        assert!(normalize(&payload).is_none());
    }
}
