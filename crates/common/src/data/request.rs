use faststr::FastStr;
use serde_json::Value;
use std::collections::HashMap;

/// An outbound request before it is bound to an http client.
pub struct RequestData {
    pub url:     FastStr,
    pub headers: HashMap<FastStr, FastStr>,
    pub body:    Option<Value>,
}

impl RequestData {
    pub fn new<T>(url: T, body: Value) -> Self
    where
        T: Into<FastStr>,
    {
        Self {
            url:     url.into(),
            headers: Default::default(),
            body:    Some(body),
        }
    }

    pub fn without_body<T>(url: T) -> Self
    where
        T: Into<FastStr>,
    {
        Self {
            url:     url.into(),
            headers: Default::default(),
            body:    None,
        }
    }

    pub fn bearer_auth<T>(&mut self, auth: T)
    where
        T: Into<FastStr>,
    {
        self.headers.insert(
            "authorization".into(),
            format!("Bearer {}", auth.into()).into(),
        );
    }
}
