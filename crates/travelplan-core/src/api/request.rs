//! The request descriptor that interceptors see before a call is issued.

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::error::{ApiError, Result};
use crate::config::BaseUrl;

/// Method, path, headers, query and body of a single call.
///
/// Request interceptors get `&mut` access before the call is issued;
/// issuing consumes the descriptor.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach query parameters from any struct or map that serializes to a
    /// JSON object. Null values are dropped, arrays become repeated keys.
    pub fn with_query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| ApiError::InvalidRequest(format!("query parameters: {}", e)))?;
        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    push_query_value(&mut self.query, &key, value);
                }
            }
            other => {
                return Err(ApiError::InvalidRequest(format!(
                    "query parameters must be an object, got {}",
                    other
                )))
            }
        }
        Ok(self)
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Absolute paths are used as-is; anything else is joined onto `base`.
    pub fn url(&self, base: &BaseUrl) -> String {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else {
            base.join(&self.path)
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Method, String, HeaderMap, Vec<(String, String)>, Option<Value>) {
        (self.method, self.path, self.headers, self.query, self.body)
    }
}

fn push_query_value(out: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push((key.to_string(), s)),
        Value::Array(items) => {
            for item in items {
                push_query_value(out, key, item);
            }
        }
        other => out.push((key.to_string(), other.to_string())),
    }
}

/// Percent-encode a single path segment (RFC 3986 unreserved set kept).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
