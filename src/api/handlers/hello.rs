//! Hello endpoints: `/hello` and `/p_hello/:name`, for GET, POST and PUT.

use axum::extract::Path;
use axum::http::Method;

use crate::api::envelope::{ResponseEnvelope, RestMethod};

/// GET|POST|PUT /hello
pub async fn hello(method: Method) -> ResponseEnvelope {
    greet(&method, None)
}

/// GET|POST|PUT /p_hello/:name
pub async fn hello_name(method: Method, Path(name): Path<String>) -> ResponseEnvelope {
    greet(&method, Some(&name))
}

fn greet(method: &Method, name: Option<&str>) -> ResponseEnvelope {
    // Routes only register GET, POST and PUT.
    let req_type = RestMethod::try_from(method).unwrap_or(RestMethod::Get);
    let msg = match name {
        Some(name) => format!("Hello {name}! You {} successfully!", req_type.past_tense()),
        None => format!("Hello! You {} successfully!", req_type.past_tense()),
    };
    ResponseEnvelope::succeeded(req_type, msg, None)
}
