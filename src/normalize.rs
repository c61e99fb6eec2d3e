//! Turns whatever envelope the API used into a flat list of call records.
use serde_json::{Map, Value};

/// Key under which the API usually wraps its payload.
pub const PAYLOAD_KEY: &str = "dados";

pub type CallRecord = Map<String, Value>;

/// The payload shapes the API has been seen to answer with.
#[derive(Debug)]
pub enum PayloadShape<'a> {
    List(&'a [Value]),
    KeyedRecords(&'a Map<String, Value>),
    SingleRecord(&'a Map<String, Value>),
    Text(&'a str),
    Other,
}

impl<'a> PayloadShape<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => PayloadShape::List(items),
            Value::Object(map) if map.values().all(Value::is_object) => {
                PayloadShape::KeyedRecords(map)
            }
            Value::Object(map) => PayloadShape::SingleRecord(map),
            Value::String(text) => PayloadShape::Text(text),
            Value::Null | Value::Bool(_) | Value::Number(_) => PayloadShape::Other,
        }
    }
}

/// Extract the call records from a decoded response. Never fails; an empty
/// list is the only signal that nothing usable came back.
pub fn normalize_records(json: &Value) -> Vec<CallRecord> {
    let payload = match json {
        Value::Object(map) => map.get(PAYLOAD_KEY).unwrap_or(json),
        _ => json,
    };

    match PayloadShape::classify(payload) {
        // The payload is sometimes JSON serialized into a string.
        PayloadShape::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner) => records_from(PayloadShape::classify(&inner)),
            Err(_) => Vec::new(),
        },
        shape => records_from(shape),
    }
}

fn records_from(shape: PayloadShape<'_>) -> Vec<CallRecord> {
    match shape {
        PayloadShape::List(items) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        PayloadShape::KeyedRecords(map) => map
            .values()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        PayloadShape::SingleRecord(map) => vec![map.clone()],
        PayloadShape::Text(_) | PayloadShape::Other => Vec::new(),
    }
}
