//! Recording transport for tests.
//!
//! Only available with the `testing` feature (or inside this crate's tests):
//!
//! ```toml
//! [dev-dependencies]
//! fastman-client = { path = "../fastman-client", features = ["testing"] }
//! ```
//!
//! Routes match on method plus URL suffix. A route answers every matching
//! request until replaced; `route_once` replies are consumed first, in order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::transport::{BaseTransport, HttpReply, HttpRequest, Method};

struct Route {
    method: Method,
    suffix: String,
    reply: Result<HttpReply>,
}

#[derive(Default)]
pub struct MockTransport {
    once: Mutex<VecDeque<Route>>,
    sticky: Mutex<Vec<Route>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `method` request whose URL ends with `suffix`.
    pub fn route(&self, method: Method, suffix: &str, reply: HttpReply) {
        self.push_sticky(method, suffix, Ok(reply));
    }

    /// Answer the next matching request only.
    pub fn route_once(&self, method: Method, suffix: &str, reply: HttpReply) {
        self.once.lock().unwrap().push_back(Route {
            method,
            suffix: suffix.to_string(),
            reply: Ok(reply),
        });
    }

    /// Fail every matching request at the transport level.
    pub fn fail(&self, method: Method, suffix: &str, error: ClientError) {
        self.push_sticky(method, suffix, Err(error));
    }

    fn push_sticky(&self, method: Method, suffix: &str, reply: Result<HttpReply>) {
        let mut sticky = self.sticky.lock().unwrap();
        sticky.retain(|r| !(r.method == method && r.suffix == suffix));
        sticky.push(Route {
            method,
            suffix: suffix.to_string(),
            reply,
        });
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<HttpRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Count recorded requests whose URL ends with `suffix`.
    pub fn calls_to(&self, suffix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.url.ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl BaseTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpReply> {
        self.calls.lock().unwrap().push(request.clone());

        let matches = |r: &Route| r.method == request.method && request.url.ends_with(&r.suffix);

        {
            let mut once = self.once.lock().unwrap();
            if let Some(pos) = once.iter().position(matches) {
                if let Some(route) = once.remove(pos) {
                    return route.reply;
                }
            }
        }

        let sticky = self.sticky.lock().unwrap();
        sticky
            .iter()
            .rev()
            .find(|r| matches(r))
            .map(|r| r.reply.clone())
            .unwrap_or_else(|| {
                Err(ClientError::NoResponse(format!(
                    "no mock route for {} {}",
                    request.method, request.url
                )))
            })
    }
}
