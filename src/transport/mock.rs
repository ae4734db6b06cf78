/*
 *  transport/mock.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock transport for testing without a device
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{DeviceRequest, DeviceResponse, Transport, Verb};
use crate::error::TransportError;

/// Mock transport for testing
///
/// Records every request it is handed and answers from a table of canned
/// responses keyed by verb and path. Unknown routes answer `200` with an
/// empty body. Clones share the same state, so a test can keep one handle
/// for inspection while the driver owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

/// Internal state for the mock transport (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockTransportState {
    /// Every request received, in order
    pub requests: Vec<DeviceRequest>,

    /// Canned responses per (verb, path)
    pub responses: HashMap<(Verb, &'static str), DeviceResponse>,

    /// Fail every call with `TransportError::Unavailable`
    pub simulate_failure: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `verb path` with `200` and `body`
    pub fn respond(&self, verb: Verb, path: &'static str, body: impl Into<String>) -> &Self {
        self.respond_with(verb, path, DeviceResponse::ok(body))
    }

    pub fn respond_with(&self, verb: Verb, path: &'static str, response: DeviceResponse) -> &Self {
        self.lock().responses.insert((verb, path), response);
        self
    }

    pub fn set_failure(&self, fail: bool) {
        self.lock().simulate_failure = fail;
    }

    /// Snapshot of recorded requests
    pub fn requests(&self) -> Vec<DeviceRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Reset recorded requests (useful between tests)
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportState> {
        // a panicking test must not take every later assertion down with it
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: DeviceRequest) -> Result<DeviceResponse, TransportError> {
        let mut state = self.lock();
        let key = (request.verb, request.path);
        state.requests.push(request);

        if state.simulate_failure {
            return Err(TransportError::Unavailable("simulated transport failure".to_string()));
        }

        Ok(state
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| DeviceResponse::ok("")))
    }
}
