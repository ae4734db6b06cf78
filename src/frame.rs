/*
 *  frame.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Boolean pixel grid and the device's text framebuffer format
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
use log::{debug, warn};

use crate::error::{FluepdotError, OutOfRangeWrite, Result};

/// Character the device uses for a flipped (lit) dot
pub const LIT: char = 'X';
/// Character the device uses for an unflipped dot
pub const UNLIT: char = ' ';

/// A runtime-sized, row-major grid of dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: Vec<bool>,
    w: usize,
    h: usize,
}

impl Frame {
    /// All-unlit frame of the given geometry.
    ///
    /// A frame with no cells is always 0x0, whichever side was zero.
    pub fn new(width: usize, height: usize) -> Self {
        let (w, h) = if width == 0 || height == 0 { (0, 0) } else { (width, height) };
        Self { cells: vec![false; w * h], w, h }
    }

    /// Build a frame from arbitrary rows (`rows[y][x]`).
    ///
    /// Width is the longest row; short rows are padded unlit.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Self {
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut frame = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &lit) in row.as_ref().iter().enumerate() {
                frame.cells[y * width + x] = lit;
            }
        }
        frame
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Returns the geometry as (width, height)
    pub fn dimensions(&self) -> (usize, usize) { (self.w, self.h) }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.w && y < self.h {
            Some(y * self.w + x)
        } else {
            None
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: usize, y: usize, lit: bool) -> std::result::Result<(), OutOfRangeWrite> {
        match self.idx(x, y) {
            Some(i) => {
                self.cells[i] = lit;
                Ok(())
            }
            None => Err(OutOfRangeWrite { x, y, width: self.w, height: self.h }),
        }
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks() panics on zero; a 0x0 frame has no cells to chunk anyway
        self.cells.chunks(self.w.max(1))
    }

    /// Number of lit dots
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// The device's newline-delimited framebuffer text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializedFrame(String);

impl SerializedFrame {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn into_string(self) -> String { self.0 }

    /// Every newline-separated segment, including the empty one after a final newline
    pub fn lines(&self) -> Vec<String> {
        self.0.split('\n').map(str::to_owned).collect()
    }

    /// Device rows only: the trailing empty segment left by a terminal newline is dropped
    pub fn retained_lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.0.split('\n').collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }

    /// (width, height) as reported by the text: first row length, retained row count
    pub fn measure(&self) -> Result<(usize, usize)> {
        let lines = self.retained_lines();
        let first = lines.first().ok_or(FluepdotError::EmptyFrame)?;
        Ok((first.chars().count(), lines.len()))
    }
}

impl fmt::Display for SerializedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SerializedFrame {
    fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for SerializedFrame {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Serialize a frame: `height` lines of `width` chars, each newline-terminated.
pub fn encode(frame: &Frame) -> SerializedFrame {
    let mut out = String::with_capacity((frame.w + 1) * frame.h);
    for y in 0..frame.h {
        for x in 0..frame.w {
            out.push(if frame.cells[y * frame.w + x] { LIT } else { UNLIT });
        }
        out.push('\n');
    }
    SerializedFrame(out)
}

/// Serialize arbitrary rows (`rows[y][x]`) onto a `width` x `height` canvas.
///
/// Lit cells outside the canvas are dropped and logged, never raised.
pub fn encode_cells<R: AsRef<[bool]>>(rows: &[R], width: usize, height: usize) -> SerializedFrame {
    let mut canvas = Frame::new(width, height);
    let mut dropped = 0usize;
    for (y, row) in rows.iter().enumerate() {
        for (x, &lit) in row.as_ref().iter().enumerate() {
            if !lit {
                continue;
            }
            if let Err(e) = canvas.set(x, y, true) {
                debug!("dropping {}", e);
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        warn!("{} lit cell(s) outside {}x{} dropped", dropped, width, height);
    }
    encode(&canvas)
}

/// Parse device text into a frame. Only `'X'` is lit; any other char is unlit.
///
/// Width follows the first row; longer rows are cut and shorter rows padded.
pub fn decode(serialized: &SerializedFrame) -> Frame {
    let lines = serialized.retained_lines();
    let width = lines.first().map_or(0, |l| l.chars().count());
    let mut frame = Frame::new(width, lines.len());
    for (y, line) in lines.iter().enumerate() {
        for (x, c) in line.chars().take(width).enumerate() {
            frame.cells[y * width + x] = c == LIT;
        }
    }
    frame
}
