//! Test Support
//!
//! Scripted in-memory transport and a local-task spawner for tokio tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;

use crate::cache::{LocalTask, Spawner};
use crate::error::TransportError;
use crate::transport::{HttpResponse, Method, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), Result<Value, TransportError>>,
    calls: Vec<RecordedCall>,
    held: bool,
    gates: Vec<oneshot::Sender<()>>,
}

/// Answers from a route table; records every request
#[derive(Default)]
pub struct MockTransport {
    state: RefCell<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `data` from now on
    pub fn respond(&self, method: Method, path: &str, data: Value) {
        self.state
            .borrow_mut()
            .routes
            .insert((method, path.to_string()), Ok(data));
    }

    /// Fail `method path` with `err` from now on
    pub fn fail(&self, method: Method, path: &str, err: TransportError) {
        self.state
            .borrow_mut()
            .routes
            .insert((method, path.to_string()), Err(err));
    }

    /// Keep requests pending until `release`
    pub fn hold(&self) {
        self.state.borrow_mut().held = true;
    }

    /// Let every held request (and every later one) through
    pub fn release(&self) {
        let gates = {
            let mut state = self.state.borrow_mut();
            state.held = false;
            std::mem::take(&mut state.gates)
        };
        for gate in gates {
            let _ = gate.send(());
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    pub fn last_body(&self, method: Method) -> Option<Value> {
        self.state
            .borrow()
            .calls
            .iter()
            .rev()
            .find(|call| call.method == method)
            .and_then(|call| call.body.clone())
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<HttpResponse, TransportError> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.calls.push(RecordedCall {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });
            if state.held {
                let (tx, rx) = oneshot::channel();
                state.gates.push(tx);
                Some(rx)
            } else {
                None
            }
        };
        if let Some(rx) = gate {
            let _ = rx.await;
        }

        let route = self
            .state
            .borrow()
            .routes
            .get(&(method, path.to_string()))
            .cloned();
        match route {
            Some(Ok(data)) => Ok(HttpResponse { status: 200, data }),
            Some(Err(err)) => Err(err),
            None => Err(TransportError::Status {
                status: 404,
                message: format!("no route for {} {}", method.as_str(), path),
            }),
        }
    }
}

/// Spawns onto the current tokio `LocalSet`
pub fn local_spawner() -> Spawner {
    Rc::new(|task: LocalTask| {
        tokio::task::spawn_local(task);
    })
}

/// Run a test body inside a `LocalSet`
pub async fn run_local<F: Future<Output = ()>>(body: F) {
    tokio::task::LocalSet::new().run_until(body).await;
}
