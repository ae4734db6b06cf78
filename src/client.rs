/*
 *  client.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Client session for a fluepdot controlled flip-dot display
 *  https://fluepdot.readthedocs.io/en/latest/
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

use log::{debug, info, warn};

use crate::config::DeviceConfig;
use crate::error::{FluepdotError, Result};
use crate::frame::{self, Frame, SerializedFrame};
use crate::mode::{Mode, PixelState};
use crate::transport::{
    DeviceRequest, DeviceResponse, HttpTransport, Transport, Verb,
    FONTS, FRAMEBUFFER, PIXEL, RENDERING_MODE, TEXT,
};

/// Geometry of the stock fluepdot panel
pub const DEFAULT_WIDTH: usize = 115;
pub const DEFAULT_HEIGHT: usize = 16;

/// Font the device uses when none is named
pub const DEFAULT_FONT: &str = "DejaVuSans12";

/// Origin and font for a text render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPlacement {
    pub x: u32,
    pub y: u32,
    pub font: String,
}

impl Default for TextPlacement {
    fn default() -> Self {
        Self { x: 0, y: 0, font: DEFAULT_FONT.to_string() }
    }
}

/// A session with one device.
///
/// Holds the base URL, the last known geometry and the font list once fetched.
/// Each operation is exactly one request; nothing is retried.
#[derive(Debug)]
pub struct Fluepdot<T: Transport> {
    transport: T,
    base_url: Option<String>,
    width: usize,
    height: usize,
    fonts: Option<Vec<String>>,
}

impl Fluepdot<HttpTransport> {
    /// HTTP session from configuration. Missing geometry falls back to the stock panel.
    pub fn from_config(config: &DeviceConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        let mut session = Fluepdot::new(transport).with_size(
            config.width.unwrap_or(DEFAULT_WIDTH),
            config.height.unwrap_or(DEFAULT_HEIGHT),
        );
        session.base_url = config.base_url.clone();
        Ok(session)
    }
}

impl<T: Transport> Fluepdot<T> {
    /// Unconfigured session; call `set_url` before talking to the device
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fonts: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.base_url = Some(url.into());
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Cached (width, height); see `get_size` to refresh from the device
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Font names from the last `get_fonts`, if any
    pub fn fonts(&self) -> Option<&[String]> {
        self.fonts.as_deref()
    }

    /// Start a request, or fail before any I/O if no base URL is set
    fn request(&self, verb: Verb, path: &'static str) -> Result<DeviceRequest> {
        let base = self.base_url.as_deref().ok_or(FluepdotError::NotConfigured)?;
        Ok(DeviceRequest::new(verb, base, path))
    }

    async fn send(&self, request: DeviceRequest) -> Result<DeviceResponse> {
        Ok(self.transport.send(request).await?)
    }

    /// Send a read and insist on a 2xx answer
    async fn read(&self, request: DeviceRequest) -> Result<String> {
        let response = self.send(request).await?.error_for_status()?;
        Ok(response.body)
    }

    /// Raw framebuffer lines, including the empty one after the final newline
    pub async fn get_frame(&self) -> Result<Vec<String>> {
        Ok(self.get_serialized_frame().await?.lines())
    }

    pub async fn get_serialized_frame(&self) -> Result<SerializedFrame> {
        let body = self.read(self.request(Verb::Get, FRAMEBUFFER)?).await?;
        Ok(SerializedFrame::new(body))
    }

    /// Current framebuffer decoded into a grid
    pub async fn get_grid(&self) -> Result<Frame> {
        Ok(frame::decode(&self.get_serialized_frame().await?))
    }

    /// Measure the device framebuffer and cache the result
    pub async fn get_size(&mut self) -> Result<(usize, usize)> {
        let (width, height) = self.get_serialized_frame().await?.measure()?;
        if (width, height) != (self.width, self.height) {
            info!("display geometry {}x{} (was {}x{})", width, height, self.width, self.height);
        }
        self.width = width;
        self.height = height;
        Ok((width, height))
    }

    pub async fn get_pixel(&self, x: u32, y: u32) -> Result<PixelState> {
        let request = self.request(Verb::Get, PIXEL)?.query("x", x).query("y", y);
        let state = PixelState::from_response(&self.read(request).await?);
        if let PixelState::Unknown(raw) = &state {
            warn!("pixel ({}, {}) reported unknown state {:?}", x, y, raw);
        }
        Ok(state)
    }

    pub async fn set_pixel(&self, x: u32, y: u32) -> Result<DeviceResponse> {
        let request = self.request(Verb::Post, PIXEL)?.query("x", x).query("y", y);
        self.send(request).await
    }

    pub async fn unset_pixel(&self, x: u32, y: u32) -> Result<DeviceResponse> {
        let request = self.request(Verb::Delete, PIXEL)?.query("x", x).query("y", y);
        self.send(request).await
    }

    /// Fetch the device font list and cache it on the session
    pub async fn get_fonts(&mut self) -> Result<&[String]> {
        let body = self.read(self.request(Verb::Get, FONTS)?).await?;
        let fonts: Vec<String> = body
            .split('\n')
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        debug!("{} fonts on device", fonts.len());
        Ok(self.fonts.insert(fonts).as_slice())
    }

    pub async fn get_mode(&self) -> Result<Mode> {
        let body = self.read(self.request(Verb::Get, RENDERING_MODE)?).await?;
        Mode::try_from(body.as_str())
    }

    pub async fn set_mode(&self, mode: Mode) -> Result<DeviceResponse> {
        let request = self.request(Verb::Put, RENDERING_MODE)?.body(mode.ordinal().to_string());
        self.send(request).await
    }

    /// Render `text` on the device. The font name is not checked locally.
    pub async fn post_text(&self, text: &str, placement: &TextPlacement) -> Result<DeviceResponse> {
        let request = self
            .request(Verb::Post, TEXT)?
            .query("x", placement.x)
            .query("y", placement.y)
            .query("font", &placement.font)
            .body(text);
        self.send(request).await
    }

    /// Post pre-serialized framebuffer text as-is
    pub async fn post_frame_raw(&self, text: impl Into<String>) -> Result<DeviceResponse> {
        let request = self.request(Verb::Post, FRAMEBUFFER)?.body(text);
        self.send(request).await
    }

    /// Post rows (`rows[y][x]`) of any shape, fitted to the session geometry.
    ///
    /// Lit cells outside the geometry are dropped.
    pub async fn post_frame<R: AsRef<[bool]>>(&self, rows: &[R]) -> Result<DeviceResponse> {
        let request = self.request(Verb::Post, FRAMEBUFFER)?;
        let text = frame::encode_cells(rows, self.width, self.height);
        self.send(request.body(text.into_string())).await
    }

    /// Post a grid, fitted to the session geometry
    pub async fn post_grid(&self, grid: &Frame) -> Result<DeviceResponse> {
        let rows: Vec<&[bool]> = grid.rows().collect();
        self.post_frame(&rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::MockTransport;

    fn session(mock: &MockTransport) -> Fluepdot<MockTransport> {
        Fluepdot::new(mock.clone()).with_base_url("http://dots.local")
    }

    #[tokio::test]
    async fn test_defaults() {
        let dots = Fluepdot::new(MockTransport::new());
        assert_eq!(dots.size(), (115, 16));
        assert_eq!(dots.base_url(), None);
        assert!(dots.fonts().is_none());
    }

    #[tokio::test]
    async fn test_get_size_updates_cache() {
        let mock = MockTransport::new();
        mock.respond(Verb::Get, FRAMEBUFFER, "     \n     \n     \n");
        let mut dots = session(&mock);

        assert_eq!(dots.get_size().await.unwrap(), (5, 3));
        assert_eq!(dots.size(), (5, 3));
    }

    #[tokio::test]
    async fn test_get_size_empty_frame() {
        let mock = MockTransport::new();
        mock.respond(Verb::Get, FRAMEBUFFER, "");
        let mut dots = session(&mock);

        assert!(matches!(dots.get_size().await, Err(FluepdotError::EmptyFrame)));
        assert_eq!(dots.size(), (115, 16));
    }

    #[tokio::test]
    async fn test_read_rejects_error_status() {
        let mock = MockTransport::new();
        mock.respond_with(Verb::Get, RENDERING_MODE, DeviceResponse { status: 500, body: "".into() });
        let dots = session(&mock);

        let err = dots.get_mode().await.unwrap_err();
        assert!(matches!(err, FluepdotError::Transport(TransportError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_write_returns_raw_response() {
        let mock = MockTransport::new();
        mock.respond_with(Verb::Post, PIXEL, DeviceResponse { status: 400, body: "bad".into() });
        let dots = session(&mock);

        let res = dots.set_pixel(200, 200).await.unwrap();
        assert_eq!(res.status, 400);
        assert_eq!(res.body, "bad");
    }

    #[tokio::test]
    async fn test_post_grid_fits_to_session() {
        let mock = MockTransport::new();
        let dots = session(&mock).with_size(2, 1);

        let grid = Frame::from_rows(&[vec![true, true, true], vec![true]]);
        dots.post_grid(&grid).await.unwrap();

        assert_eq!(mock.requests()[0].body.as_deref(), Some("XX\n"));
    }
}
