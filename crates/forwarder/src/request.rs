use crate::error::{Error, Result};
use common::data::ChatRequest;
use faststr::FastStr;
use serde_json::Value;

/// Trailing segment of a dotted model identifier, or the whole string.
#[inline]
pub fn short_id(model: &str) -> &str {
    model.rsplit_once('.').map_or(model, |(_, id)| id)
}

/// Checks the fields the forwarder relies on and returns the model field.
pub fn validate(request: &ChatRequest) -> Result<&str> {
    let model = match request.model() {
        Some(Value::String(model)) if !model.trim().is_empty() => model,
        Some(Value::String(_)) => {
            return Err(Error::InvalidRequest("the 'model' field must not be empty".into()));
        }
        Some(_) => {
            return Err(Error::InvalidRequest("the 'model' field must be a string".into()));
        }
        None => return Err(Error::InvalidRequest("the 'model' field is required".into())),
    };
    match request.messages() {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(Error::InvalidRequest("the 'messages' field must be a list".into()));
        }
        None => return Err(Error::InvalidRequest("the 'messages' field is required".into())),
    }
    Ok(model)
}

/// Short id used for the model table lookup; an empty one is rejected.
pub fn lookup_id(model: &str) -> Result<FastStr> {
    let id = short_id(model).trim();
    if id.is_empty() {
        return Err(Error::InvalidRequest(
            format!("invalid model format provided: {model}").into(),
        ));
    }
    Ok(id.to_owned().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> ChatRequest {
        ChatRequest::try_from(value).unwrap()
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("foo.bar.42"), "42");
        assert_eq!(short_id("infomaniak_manifold.mixtral"), "mixtral");
        assert_eq!(short_id("42"), "42");
        assert_eq!(short_id("foo."), "");
    }

    #[test]
    fn test_validate() {
        let req = request(json!({"model": "foo.bar.42", "messages": []}));
        let model = validate(&req).unwrap();
        assert_eq!(model, "foo.bar.42");
        assert_eq!(lookup_id(model).unwrap().as_str(), "42");
    }

    #[test]
    fn test_lookup_id_rejects_empty() {
        let err = lookup_id("foo.").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(lookup_id("foo. ").is_err());
    }

    #[test]
    fn test_validate_rejects() {
        let cases = [
            json!({"messages": []}),
            json!({"model": "", "messages": []}),
            json!({"model": 42, "messages": []}),
            json!({"model": "a.1"}),
            json!({"model": "a.1", "messages": "hi"}),
        ];
        for case in cases {
            let err = validate(&request(case.clone())).unwrap_err();
            assert!(
                matches!(err, Error::InvalidRequest(_)),
                "expected validation error for {case}, got {err}"
            );
        }
    }
}
