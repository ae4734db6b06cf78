/*
 *  error.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the driver and its transport
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

use thiserror::Error;

/// Errors raised by the transport collaborator. Surfaced to callers unchanged.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or protocol failure inside reqwest
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL + endpoint did not form a usable URL
    #[error("Invalid device URL: {0}")]
    InvalidUrl(String),

    /// Device answered with a non-2xx status on a read
    #[error("Device returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport could not reach the device (used by the mock transport)
    #[error("Device unavailable: {0}")]
    Unavailable(String),
}

/// Unified error type for driver operations
#[derive(Debug, Error)]
pub enum FluepdotError {
    /// No base URL has been configured for the session
    #[error("base URL is not configured, call set_url first")]
    NotConfigured,

    /// Measuring a serialized frame with no rows
    #[error("serialized frame contains no rows")]
    EmptyFrame,

    /// Device reported a rendering mode we do not know
    #[error("unknown rendering mode {0:?}")]
    UnknownMode(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A cell that fell outside the frame geometry.
///
/// Bulk frame writes drop these and log them; only `Frame::set` hands one back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pixel ({x}, {y}) is outside the {width}x{height} frame")]
pub struct OutOfRangeWrite {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

pub type Result<T> = std::result::Result<T, FluepdotError>;
