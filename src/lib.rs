/*
 *  lib.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Client library for flip-dot displays driven by fluepdot firmware
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

//! Talk to a fluepdot flip-dot controller over its small HTTP interface.
//!
//! The framebuffer travels as text: one line per row, `X` for a flipped dot
//! and a space for an unflipped one. [`frame`] converts between that text and
//! a boolean [`Frame`]; [`Fluepdot`] wraps the device endpoints.
//!
//! ```no_run
//! use fluepdot::{Fluepdot, HttpTransport, Mode, TextPlacement};
//!
//! # async fn demo() -> fluepdot::Result<()> {
//! let mut dots = Fluepdot::new(HttpTransport::new(None)?).with_base_url("http://fluepdot.local");
//! let (w, h) = dots.get_size().await?;
//! dots.set_mode(Mode::Differential).await?;
//! dots.post_text("hello", &TextPlacement::default()).await?;
//! # let _ = (w, h);
//! # Ok(()) }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod mode;
pub mod transport;

pub use client::{Fluepdot, TextPlacement, DEFAULT_FONT, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use clock::ClockOptions;
pub use error::{FluepdotError, OutOfRangeWrite, Result, TransportError};
pub use frame::{decode, encode, encode_cells, Frame, SerializedFrame};
pub use mode::{Mode, PixelState};
pub use transport::{DeviceRequest, DeviceResponse, HttpTransport, MockTransport, Transport, Verb};
