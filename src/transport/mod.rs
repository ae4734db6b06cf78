/*
 *  transport/mod.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  HTTP verb transport seam between the driver and the device
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

use std::fmt;
use std::future::Future;

use crate::error::TransportError;

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

/// Device endpoints, relative to the base URL
pub const FRAMEBUFFER: &str = "/framebuffer";
pub const TEXT: &str = "/framebuffer/text";
pub const PIXEL: &str = "/pixel";
pub const FONTS: &str = "/fonts";
pub const RENDERING_MODE: &str = "/rendering/mode";

/// HTTP verbs the device understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// One request against the device. Built fresh per call and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRequest {
    pub verb: Verb,
    pub base_url: String,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl DeviceRequest {
    pub fn new(verb: Verb, base_url: &str, path: &'static str) -> Self {
        Self {
            verb,
            base_url: base_url.to_owned(),
            path,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Base URL joined with the endpoint path, without query
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

/// Status and body text returned by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResponse {
    pub status: u16,
    pub body: String,
}

impl DeviceResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `TransportError::Status`
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status { status: self.status, body: self.body })
        }
    }
}

/// Performs one HTTP exchange with the device.
///
/// Implementations must not retry; every failure goes back to the caller as-is.
pub trait Transport {
    fn send(&self, request: DeviceRequest) -> impl Future<Output = Result<DeviceResponse, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_joins_without_double_slash() {
        let req = DeviceRequest::new(Verb::Get, "http://fluepdot.local/", FRAMEBUFFER);
        assert_eq!(req.url(), "http://fluepdot.local/framebuffer");
        let req = DeviceRequest::new(Verb::Get, "http://10.0.0.7", TEXT);
        assert_eq!(req.url(), "http://10.0.0.7/framebuffer/text");
    }

    #[test]
    fn test_request_builder_keeps_query_order() {
        let req = DeviceRequest::new(Verb::Post, "http://d", TEXT)
            .query("x", 8)
            .query("y", 1)
            .query("font", "fixed_7x14")
            .body("12:00");
        assert_eq!(req.query, vec![
            ("x", "8".to_string()),
            ("y", "1".to_string()),
            ("font", "fixed_7x14".to_string()),
        ]);
        assert_eq!(req.body.as_deref(), Some("12:00"));
    }

    #[test]
    fn test_error_for_status() {
        assert!(DeviceResponse::ok("").error_for_status().is_ok());
        let err = DeviceResponse { status: 404, body: "nope".into() }.error_for_status().unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 404, .. }));
    }
}
