//! Scripted transport fake for lifecycle and feed tests.
//!
//! Plays back a fixed queue of responses and records every call, so tests
//! can assert both what was sent and how a poll loop consumed the script.

use crate::error::{ClientError, ClientResult};
use crate::rest::ExchangeApi;
use reqwest::Method;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

/// One recorded call.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub endpoint: String,
    pub body: Option<Value>,
    pub method: Method,
    pub allow_404: bool,
}

/// `ExchangeApi` fake that returns scripted responses in order.
///
/// Running past the end of the script yields an error, which doubles as
/// the stop signal for never-returning loops under test.
pub(crate) struct ScriptedApi {
    responses: RefCell<VecDeque<Value>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedApi {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl ExchangeApi for ScriptedApi {
    async fn call(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        method: Method,
        allow_404: bool,
    ) -> ClientResult<Value> {
        self.calls.borrow_mut().push(RecordedCall {
            endpoint: endpoint.to_string(),
            body: body.cloned(),
            method,
            allow_404,
        });

        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ClientError::Parse {
                endpoint: endpoint.to_string(),
                message: "script exhausted".to_string(),
            })
    }
}
