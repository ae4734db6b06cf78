/*
 *  transport/http.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  reqwest backed transport
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

use std::time::Duration;
use log::debug;
use reqwest::{Client, Method, Url, header};

use super::{DeviceRequest, DeviceResponse, Transport, Verb};
use crate::error::TransportError;

const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

/// Talks to the device over plain HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client. `timeout` of None means wait as long as the device takes.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("text/plain"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(t) = timeout {
            builder = builder.connect_timeout(t).timeout(t);
        }
        let client = builder.build()?;

        Ok(Self { client })
    }
}

fn method(verb: Verb) -> Method {
    match verb {
        Verb::Get => Method::GET,
        Verb::Post => Method::POST,
        Verb::Put => Method::PUT,
        Verb::Delete => Method::DELETE,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: DeviceRequest) -> Result<DeviceResponse, TransportError> {
        let url = Url::parse(&request.url())
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", request.url(), e)))?;

        debug!("{} {} {:?}", request.verb, url, request.query);

        let mut builder = self.client
            .request(method(request.verb), url)
            .query(&request.query);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(DeviceResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_mapping() {
        assert_eq!(method(Verb::Get), Method::GET);
        assert_eq!(method(Verb::Post), Method::POST);
        assert_eq!(method(Verb::Put), Method::PUT);
        assert_eq!(method(Verb::Delete), Method::DELETE);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_network() {
        let transport = HttpTransport::new(None).unwrap();
        let req = DeviceRequest::new(Verb::Get, "not a url", crate::transport::FRAMEBUFFER);
        let err = transport.send(req).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
