//! Uniform response envelope for every endpoint.
//!
//! Every response body has the shape `{ "status", "req_type", "msg", "val" }`
//! and is sent with HTTP 200; API-level success or failure lives in `status`.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

/// HTTP method the envelope answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RestMethod {
    Get,
    Post,
    Put,
}

impl RestMethod {
    /// Past-tense verb used by the hello endpoints ("GETted", ...).
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Get => "GETted",
            Self::Post => "POSTed",
            Self::Put => "PUTted",
        }
    }
}

impl TryFrom<&Method> for RestMethod {
    type Error = ();

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        if method == Method::GET {
            Ok(Self::Get)
        } else if method == Method::POST {
            Ok(Self::Post)
        } else if method == Method::PUT {
            Ok(Self::Put)
        } else {
            Err(())
        }
    }
}

/// Envelope state. Ordered by severity; transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Pending,
    Success,
    Error,
    ServerError,
}

/// Response body: `{ status, req_type, msg, val }`, encoded by [`ResponseEnvelope::to_mapping`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    status: ResponseStatus,
    req_type: RestMethod,
    msg: String,
    val: Option<Map<String, Value>>,
}

impl ResponseEnvelope {
    /// Fresh envelope in the pending state.
    pub fn new(req_type: RestMethod) -> Self {
        Self {
            status: ResponseStatus::Pending,
            req_type,
            msg: "No result".to_string(),
            val: None,
        }
    }

    /// Shorthand for an envelope that succeeded without further processing.
    pub fn succeeded(
        req_type: RestMethod,
        msg: impl Into<String>,
        val: Option<Map<String, Value>>,
    ) -> Self {
        let mut env = Self::new(req_type);
        env.transition(ResponseStatus::Success, msg.into(), val);
        env
    }

    pub const fn status(&self) -> ResponseStatus {
        self.status
    }

    pub const fn req_type(&self) -> RestMethod {
        self.req_type
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub const fn val(&self) -> Option<&Map<String, Value>> {
        self.val.as_ref()
    }

    /// Mark the request successful and attach the payload.
    pub fn request_succeeded(&mut self, msg: impl Into<String>, val: Map<String, Value>) -> bool {
        self.transition(ResponseStatus::Success, msg.into(), Some(val))
    }

    /// Mark a caller-visible failure. Any payload is dropped.
    pub fn request_errored(&mut self, msg: impl Into<String>) -> bool {
        self.transition(ResponseStatus::Error, msg.into(), None)
    }

    /// Mark an unexpected internal failure. Any payload is dropped.
    pub fn server_errored(&mut self, msg: impl Into<String>) -> bool {
        self.transition(ResponseStatus::ServerError, msg.into(), None)
    }

    /// Returns `false` (and leaves the envelope untouched) when `next` is not
    /// more severe than the current state.
    fn transition(
        &mut self,
        next: ResponseStatus,
        msg: String,
        val: Option<Map<String, Value>>,
    ) -> bool {
        if next <= self.status {
            tracing::debug!(from = ?self.status, to = ?next, "Ignoring backwards envelope transition");
            return false;
        }
        self.status = next;
        self.msg = msg;
        self.val = val;
        true
    }

    /// Deterministic JSON mapping of the envelope.
    pub fn to_mapping(&self) -> Value {
        serde_json::json!({
            "status": self.status,
            "req_type": self.req_type,
            "msg": self.msg,
            "val": self.val,
        })
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self.to_mapping())).into_response()
    }
}
