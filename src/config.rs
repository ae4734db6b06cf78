/*
 *  config.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, command line
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

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::clock::ClockOptions;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level configuration. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub device: Option<DeviceConfig>,
    pub clock: Option<ClockConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DeviceConfig {
    pub base_url: Option<String>,   // e.g. "http://fluepdot.local"
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub timeout_ms: Option<u64>,    // unset: no client-side timeout
}

impl DeviceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClockConfig {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub font: Option<String>,
    pub format: Option<String>,     // chrono strftime
    pub poll_ms: Option<u64>,
}

impl ClockConfig {
    /// Fill unset fields from `ClockOptions::default()`
    pub fn options(&self) -> ClockOptions {
        let d = ClockOptions::default();
        ClockOptions {
            x: self.x.unwrap_or(d.x),
            y: self.y.unwrap_or(d.y),
            font: self.font.clone().unwrap_or(d.font),
            format: self.format.clone().unwrap_or(d.format),
            poll_interval: self.poll_ms.map(Duration::from_millis).unwrap_or(d.poll_interval),
        }
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "fluepdot", version, about = "Drive a fluepdot flip-dot display")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Device base URL, e.g. http://fluepdot.local
    #[arg(long, value_hint = ValueHint::Url)]
    pub url: Option<String>,
    #[arg(long)]
    pub width: Option<usize>,
    #[arg(long)]
    pub height: Option<usize>,
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand to run; only `--dump-config` may go without one
    pub fn require_command(&self) -> Result<Command, ConfigError> {
        self.command
            .clone()
            .ok_or_else(|| ConfigError::Validation("no command given, see --help".into()))
    }
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum Command {
    /// Print the device framebuffer
    Frame,
    /// Query and print the display geometry
    Size,
    /// Post a file verbatim as the framebuffer
    PostFrame {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Post a file of X/space rows, fitted to the display geometry
    PostGrid {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Read or write a single dot
    Pixel {
        #[command(subcommand)]
        action: PixelAction,
    },
    /// Render text on the device
    Text {
        text: String,
        #[arg(long, default_value_t = 0)]
        x: u32,
        #[arg(long, default_value_t = 0)]
        y: u32,
        #[arg(long, default_value = crate::client::DEFAULT_FONT)]
        font: String,
    },
    /// List fonts available on the device
    Fonts,
    /// Show, or set, the rendering mode (full | differential)
    Mode {
        mode: Option<String>,
    },
    /// Show the current time, re-rendering on change, until interrupted
    Clock,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum PixelAction {
    Get { x: u32, y: u32 },
    Set { x: u32, y: u32 },
    Unset { x: u32, y: u32 },
}

/// Read YAML, merge CLI overrides, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of effective config
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/fluepdot/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/fluepdot/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/fluepdot.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["fluepdot.yaml", "config/fluepdot.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    match (&mut dst.device, src.device) {
        (None, Some(c)) => dst.device = Some(c),
        (Some(d), Some(s)) => merge_device(d, s),
        _ => {}
    }
    match (&mut dst.clock, src.clock) {
        (None, Some(c)) => dst.clock = Some(c),
        (Some(d), Some(s)) => merge_clock(d, s),
        _ => {}
    }
}

fn merge_device(dst: &mut DeviceConfig, src: DeviceConfig) {
    if src.base_url.is_some()   { dst.base_url = src.base_url; }
    if src.width.is_some()      { dst.width = src.width; }
    if src.height.is_some()     { dst.height = src.height; }
    if src.timeout_ms.is_some() { dst.timeout_ms = src.timeout_ms; }
}

fn merge_clock(dst: &mut ClockConfig, src: ClockConfig) {
    if src.x.is_some()       { dst.x = src.x; }
    if src.y.is_some()       { dst.y = src.y; }
    if src.font.is_some()    { dst.font = src.font; }
    if src.format.is_some()  { dst.format = src.format; }
    if src.poll_ms.is_some() { dst.poll_ms = src.poll_ms; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    let any_device = cli.url.is_some()
        || cli.width.is_some()
        || cli.height.is_some()
        || cli.timeout_ms.is_some();

    if any_device && cfg.device.is_none() {
        cfg.device = Some(DeviceConfig::default());
    }
    if let Some(device) = cfg.device.as_mut() {
        if cli.url.is_some()        { device.base_url = cli.url.clone(); }
        if cli.width.is_some()      { device.width = cli.width; }
        if cli.height.is_some()     { device.height = cli.height; }
        if cli.timeout_ms.is_some() { device.timeout_ms = cli.timeout_ms; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(device) = cfg.device.as_ref() {
        if device.width == Some(0) || device.height == Some(0) {
            return Err(ConfigError::Validation("device width/height must be > 0".into()));
        }
        if let Some(url) = device.base_url.as_deref() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "device base_url must start with http:// or https://, got {url}"
                )));
            }
        }
    }
    if let Some(clock) = cfg.clock.as_ref() {
        if clock.poll_ms == Some(0) {
            return Err(ConfigError::Validation("clock poll_ms must be > 0".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("fluepdot").chain(args.iter().copied()))
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let mut cfg = parse_yaml(
            "log_level: debug\ndevice:\n  base_url: http://a.local\n  width: 115\n  height: 16\n",
        ).unwrap();
        apply_cli_overrides(&mut cfg, &cli(&["--url", "http://b.local", "--height", "7", "size"]));

        let device = cfg.device.unwrap();
        assert_eq!(device.base_url.as_deref(), Some("http://b.local"));
        assert_eq!(device.width, Some(115));
        assert_eq!(device.height, Some(7));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut dst = parse_yaml("clock:\n  x: 3\n  font: fixed_5x8\n").unwrap();
        merge(&mut dst, parse_yaml("clock:\n  x: 10\n").unwrap());
        let clock = dst.clock.unwrap();
        assert_eq!(clock.x, Some(10));
        assert_eq!(clock.font.as_deref(), Some("fixed_5x8"));
    }

    #[test]
    fn test_validation() {
        let bad = parse_yaml("device:\n  width: 0\n").unwrap();
        assert!(matches!(validate(&bad), Err(ConfigError::Validation(_))));

        let bad = parse_yaml("device:\n  base_url: fluepdot.local\n").unwrap();
        assert!(matches!(validate(&bad), Err(ConfigError::Validation(_))));

        let bad = parse_yaml("clock:\n  poll_ms: 0\n").unwrap();
        assert!(matches!(validate(&bad), Err(ConfigError::Validation(_))));

        let good = parse_yaml("device:\n  base_url: https://dots.example\n").unwrap();
        assert!(validate(&good).is_ok());
    }

    #[test]
    fn test_clock_options_defaults() {
        let opts = ClockConfig { y: Some(4), ..Default::default() }.options();
        assert_eq!(opts.x, 8);
        assert_eq!(opts.y, 4);
        assert_eq!(opts.font, "fixed_7x14");
        assert_eq!(opts.format, "%d.%m.%y %H:%M");
    }

    #[test]
    fn test_cli_subcommands() {
        let c = cli(&["pixel", "set", "3", "4"]);
        assert_eq!(c.command, Some(Command::Pixel { action: PixelAction::Set { x: 3, y: 4 } }));

        let c = cli(&["text", "hello", "--y", "2"]);
        assert_eq!(c.command, Some(Command::Text {
            text: "hello".into(),
            x: 0,
            y: 2,
            font: "DejaVuSans12".into(),
        }));
    }

    #[test]
    fn test_missing_command_is_an_error() {
        assert!(matches!(cli(&["--url", "http://a.local"]).require_command(), Err(ConfigError::Validation(_))));
        assert_eq!(cli(&["fonts"]).require_command().unwrap(), Command::Fonts);
    }

    #[test]
    fn test_dump_round_trips() {
        let cfg = parse_yaml("device:\n  base_url: http://a.local\n").unwrap();
        let again = parse_yaml(&dump(&cfg).unwrap()).unwrap();
        assert_eq!(cfg, again);
    }
}
