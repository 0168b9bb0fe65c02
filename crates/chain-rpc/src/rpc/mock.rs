use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::RpcError;

use super::transport::{HttpReply, HttpRequest, Transport};

type Responder = Box<dyn Fn(&Value) -> Result<HttpReply, RpcError> + Send + Sync>;

/// What the mock saw for one POST.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub body: Value,
    pub auth: Option<(String, String)>,
    pub timeout: Option<Duration>,
}

/// A test transport that records every request and replays canned replies.
///
/// Queued replies are consumed first; once exhausted, the optional responder
/// answers, and without one every request gets a `null` result echoing the
/// request id.
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpReply, RpcError>>>,
    responder: Option<Responder>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
            responder: None,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.requests().into_iter().map(|r| r.body).collect()
    }

    pub fn last_body(&self) -> Value {
        self.bodies().pop().expect("at least one request was sent")
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<Result<HttpReply, RpcError>>,
    responder: Option<Responder>,
}

impl MockTransportBuilder {
    pub fn reply_json(self, body: Value) -> Self {
        self.reply_raw(StatusCode::OK, &body.to_string())
    }

    pub fn reply_raw(mut self, status: StatusCode, body: &str) -> Self {
        self.replies.push_back(Ok(HttpReply {
            status,
            body: body.to_owned(),
        }));
        self
    }

    pub fn fail(mut self, err: RpcError) -> Self {
        self.replies.push_back(Err(err));
        self
    }

    pub fn respond_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<HttpReply, RpcError> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(f));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            responder: self.responder,
            requests: Mutex::new(Vec::new()),
        }
    }
}

/// A `200 OK` reply wrapping `result` in an envelope for `request`'s id.
pub fn ok_envelope(request: &Value, result: Value) -> Result<HttpReply, RpcError> {
    Ok(HttpReply {
        status: StatusCode::OK,
        body: json!({ "id": request["id"], "jsonrpc": "2.0", "result": result }).to_string(),
    })
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, request: HttpRequest<'_>) -> Result<HttpReply, RpcError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(RecordedRequest {
                url: request.url.to_owned(),
                body: request.body.clone(),
                auth: request
                    .auth
                    .map(|(user, pass)| (user.to_owned(), pass.to_owned())),
                timeout: request.timeout,
            });

        let queued = self.replies.lock().expect("mock lock poisoned").pop_front();
        if let Some(reply) = queued {
            return reply;
        }
        if let Some(responder) = &self.responder {
            return responder(request.body);
        }
        ok_envelope(request.body, Value::Null)
    }
}
