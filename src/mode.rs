/*
 *  mode.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Device-side rendering mode and single pixel readback
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
use std::str::FromStr;

use crate::error::FluepdotError;
use crate::frame::{LIT, UNLIT};

/// How the device redraws on update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Flip every dot each update
    #[default]
    Full,
    /// Flip only the dots that changed since the last frame
    Differential,
}

impl Mode {
    /// Wire value
    pub fn ordinal(self) -> u8 {
        match self {
            Mode::Full => 0,
            Mode::Differential => 1,
        }
    }
}

impl TryFrom<&str> for Mode {
    type Error = FluepdotError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        match text.trim() {
            "0" => Ok(Mode::Full),
            "1" => Ok(Mode::Differential),
            other => Err(FluepdotError::UnknownMode(other.to_string())),
        }
    }
}

/// Accepts the CLI spellings as well as the ordinals
impl FromStr for Mode {
    type Err = FluepdotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Mode::Full),
            "differential" | "diff" => Ok(Mode::Differential),
            _ => Mode::try_from(s),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => write!(f, "FULL"),
            Mode::Differential => write!(f, "DIFFERENTIAL"),
        }
    }
}

/// One dot as read back from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelState {
    Lit,
    Unlit,
    /// Device answered with something other than `X` or a space
    Unknown(String),
}

impl PixelState {
    pub fn from_response(body: &str) -> Self {
        let mut chars = body.chars();
        match (chars.next(), chars.next()) {
            (Some(LIT), None) => PixelState::Lit,
            (Some(UNLIT), None) => PixelState::Unlit,
            _ => PixelState::Unknown(body.to_string()),
        }
    }

    /// `None` when the state is unknown
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PixelState::Lit => Some(true),
            PixelState::Unlit => Some(false),
            PixelState::Unknown(_) => None,
        }
    }
}

impl fmt::Display for PixelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelState::Lit => write!(f, "lit"),
            PixelState::Unlit => write!(f, "unlit"),
            PixelState::Unknown(raw) => write!(f, "unknown ({:?})", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_device_text() {
        assert_eq!(Mode::try_from("0").unwrap(), Mode::Full);
        assert_eq!(Mode::try_from("1").unwrap(), Mode::Differential);
        assert_eq!(Mode::try_from("1\n").unwrap(), Mode::Differential);
        assert!(matches!(Mode::try_from("2"), Err(FluepdotError::UnknownMode(v)) if v == "2"));
        assert!(matches!(Mode::try_from(""), Err(FluepdotError::UnknownMode(_))));
    }

    #[test]
    fn test_mode_ordinal_round_trip() {
        for mode in [Mode::Full, Mode::Differential] {
            assert_eq!(Mode::try_from(mode.ordinal().to_string().as_str()).unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_cli_names() {
        assert_eq!("full".parse::<Mode>().unwrap(), Mode::Full);
        assert_eq!("Differential".parse::<Mode>().unwrap(), Mode::Differential);
        assert_eq!("1".parse::<Mode>().unwrap(), Mode::Differential);
        assert!("partial".parse::<Mode>().is_err());
    }

    #[test]
    fn test_pixel_state_tri_state() {
        assert_eq!(PixelState::from_response("X"), PixelState::Lit);
        assert_eq!(PixelState::from_response(" "), PixelState::Unlit);
        assert_eq!(PixelState::from_response("?"), PixelState::Unknown("?".into()));
        assert_eq!(PixelState::from_response(""), PixelState::Unknown(String::new()));
        assert_eq!(PixelState::from_response("X\n"), PixelState::Unknown("X\n".into()));
        assert_eq!(PixelState::from_response("?").as_bool(), None);
        assert_eq!(PixelState::Lit.as_bool(), Some(true));
    }
}
