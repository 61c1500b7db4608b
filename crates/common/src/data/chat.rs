use faststr::FastStr;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request fields that are passed through to the upstream endpoint.
pub const FORWARDED_FIELDS: [&str; 13] = [
    "model",
    "messages",
    "frequency_penalty",
    "max_tokens",
    "presence_penalty",
    "response_format",
    "seed",
    "stop",
    "stream",
    "temperature",
    "tool_choice",
    "tools",
    "top_p",
];

/// Chat-completion request as sent by the host. Kept as a raw JSON object:
/// hosts attach their own bookkeeping keys, which are dropped on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatRequest(Map<String, Value>);

impl ChatRequest {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn model(&self) -> Option<&Value> {
        self.0.get("model")
    }

    pub fn messages(&self) -> Option<&Value> {
        self.0.get("messages")
    }

    /// Truthiness of the `stream` flag; hosts send bools, strings or numbers.
    pub fn stream_requested(&self) -> bool {
        match self.0.get("stream") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
            }
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }

    /// Outbound payload: allow-listed fields only, `model` replaced by the
    /// remote name and `stream` sent as a plain bool.
    pub fn into_payload(self, remote_name: &FastStr) -> Value {
        let stream = self.stream_requested();
        let mut fields = self.0;
        let mut payload: Map<String, Value> = FORWARDED_FIELDS
            .iter()
            .filter_map(|key| fields.remove(*key).map(|v| ((*key).to_owned(), v)))
            .collect();
        payload.insert("model".to_owned(), Value::String(remote_name.to_string()));
        if let Some(flag) = payload.get_mut("stream") {
            *flag = Value::Bool(stream);
        }
        Value::Object(payload)
    }
}

impl From<Map<String, Value>> for ChatRequest {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl TryFrom<Value> for ChatRequest {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> ChatRequest {
        ChatRequest::try_from(value).unwrap()
    }

    #[test]
    fn test_payload_drops_unknown_fields() {
        let req = request(json!({
            "model": "infomaniak.42",
            "messages": [{"role": "user", "content": "hi"}],
            "user_id": "u-1",
            "chat_id": "c-1",
            "title": "hello",
            "temperature": 0.2,
            "stream": true
        }));
        let payload = req.into_payload(&FastStr::from_static_str("mixtral"));
        let payload = payload.as_object().unwrap();

        assert_eq!(payload["model"], "mixtral");
        assert_eq!(payload["temperature"], 0.2);
        assert_eq!(payload["stream"], true);
        assert!(!payload.contains_key("user_id"));
        assert!(!payload.contains_key("chat_id"));
        assert!(!payload.contains_key("title"));
        assert_eq!(payload.len(), 4);
    }

    #[test]
    fn test_payload_keeps_every_allowed_field() {
        let mut fields = Map::new();
        for key in FORWARDED_FIELDS {
            fields.insert(key.to_owned(), json!(key));
        }
        let payload = ChatRequest::new(fields).into_payload(&"remote".into());
        let payload = payload.as_object().unwrap();
        assert_eq!(payload.len(), FORWARDED_FIELDS.len());
        assert_eq!(payload["model"], "remote");
        assert_eq!(payload["top_p"], "top_p");
        assert_eq!(payload["stream"], false);
    }

    #[test]
    fn test_payload_stream_flag_is_bool() {
        let remote = FastStr::from_static_str("mixtral");
        let payload = request(json!({"model": "a.1", "stream": "yes"})).into_payload(&remote);
        assert_eq!(payload["stream"], true);

        let payload = request(json!({"model": "a.1", "stream": 0})).into_payload(&remote);
        assert_eq!(payload["stream"], false);

        let payload = request(json!({"model": "a.1"})).into_payload(&remote);
        assert!(payload.get("stream").is_none());
    }

    #[test]
    fn test_stream_flag() {
        assert!(request(json!({"stream": true})).stream_requested());
        assert!(request(json!({"stream": "True"})).stream_requested());
        assert!(request(json!({"stream": "1"})).stream_requested());
        assert!(request(json!({"stream": 1})).stream_requested());
        assert!(!request(json!({"stream": false})).stream_requested());
        assert!(!request(json!({"stream": "no"})).stream_requested());
        assert!(!request(json!({"stream": 0})).stream_requested());
        assert!(!request(json!({"stream": null})).stream_requested());
        assert!(!request(json!({})).stream_requested());
    }

    #[test]
    fn test_deserialize_object_only() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"model": "a.b", "messages": []}"#).unwrap();
        assert_eq!(req.model(), Some(&json!("a.b")));
        assert!(serde_json::from_str::<ChatRequest>("[1, 2]").is_err());
        assert!(ChatRequest::try_from(json!("text")).is_err());
    }
}
