/*
 *  clock.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wall clock on the dots, re-rendered only when the text changes
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

use std::future::Future;
use std::time::Duration;
use chrono::Local;
use log::{debug, info};
use tokio::time::{interval, MissedTickBehavior};

use crate::client::{Fluepdot, TextPlacement};
use crate::error::Result;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockOptions {
    pub x: u32,
    pub y: u32,
    pub font: String,
    /// chrono strftime pattern
    pub format: String,
    /// How often the clock is sampled; a render only happens on change
    pub poll_interval: Duration,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            x: 8,
            y: 1,
            font: "fixed_7x14".to_string(),
            format: "%d.%m.%y %H:%M".to_string(),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl<T: Transport> Fluepdot<T> {
    /// Keep the current local time on the display until `shutdown` resolves.
    ///
    /// Runs indefinitely otherwise. Returns how many renders were posted.
    pub async fn post_time<F>(&self, options: &ClockOptions, shutdown: F) -> Result<usize>
    where
        F: Future<Output = ()>,
    {
        let format = options.format.clone();
        self.post_time_with(options, move || Local::now().format(&format).to_string(), shutdown)
            .await
    }

    /// `post_time` with the time source supplied by the caller
    pub async fn post_time_with<C, F>(&self, options: &ClockOptions, mut clock: C, shutdown: F) -> Result<usize>
    where
        C: FnMut() -> String,
        F: Future<Output = ()>,
    {
        let placement = TextPlacement {
            x: options.x,
            y: options.y,
            font: options.font.clone(),
        };
        let mut ticker = interval(options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut shown = String::new();
        let mut renders = 0usize;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("clock stopped after {} render(s)", renders);
                    return Ok(renders);
                }
                _ = ticker.tick() => {
                    let now = clock();
                    if now != shown {
                        debug!("clock -> {}", now);
                        // a stalled device must not outlive the shutdown signal
                        tokio::select! {
                            biased;
                            _ = &mut shutdown => {
                                info!("clock stopped mid-render after {} render(s)", renders);
                                return Ok(renders);
                            }
                            posted = self.post_text(&now, &placement) => { posted?; }
                        }
                        shown = now;
                        renders += 1;
                    }
                }
            }
        }
    }
}
