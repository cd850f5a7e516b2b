/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

// src/config.rs
// Command line options for the node binaries. Anything a deployment sets
// per device can also come from the environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use wardlink::DeviceIdentity;

use crate::brightness::DEFAULT_BRIGHTNESS_THRESHOLD;

pub const LED_NODE_APP_NAME: &str = "FastLEDControl";
pub const DASHBOARD_APP_NAME: &str = "LEDDashboard";

// DeviceArgs identify the bed a node serves and where its broker is.
#[derive(Parser, Debug, Clone)]
pub struct DeviceArgs {
    #[clap(
        long,
        env = "WARDLINK_BROKER",
        default_value = "localhost:1883",
        help = "MQTT broker address as host[:port]"
    )]
    pub broker: String,

    #[clap(long, env = "DEVICE_ROOM_NO", help = "Room number of this device")]
    pub room: String,

    #[clap(long, env = "DEVICE_BED_NO", help = "Bed number of this device")]
    pub bed: String,
}

impl DeviceArgs {
    pub fn identity(&self, app_name: &str) -> DeviceIdentity {
        DeviceIdentity::new(app_name, &self.room, &self.bed)
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(name = "wardlink-led-node")]
pub struct LedNodeOptions {
    #[clap(long, short, help = "Turn on debug logging (same as RUST_LOG=debug)")]
    pub debug: bool,

    #[clap(flatten)]
    pub device: DeviceArgs,

    #[clap(help = "Raw 8-bit grayscale frame stream to read, or - for stdin")]
    pub input: PathBuf,

    #[clap(long, default_value_t = 640, help = "Frame width in pixels")]
    pub width: usize,

    #[clap(long, default_value_t = 480, help = "Frame height in pixels")]
    pub height: usize,

    #[clap(
        long,
        default_value_t = DEFAULT_BRIGHTNESS_THRESHOLD,
        help = "Mean brightness below which the LEDs are turned on"
    )]
    pub threshold: f64,

    #[clap(
        long,
        default_value = "10s",
        value_parser = humantime::parse_duration,
        help = "Re-send the LED decision at least this often"
    )]
    pub signal_period: Duration,

    #[clap(
        long,
        default_value = "20s",
        value_parser = humantime::parse_duration,
        help = "Stop if no frame arrives for this long"
    )]
    pub capture_wait: Duration,
}

impl LedNodeOptions {
    pub fn load() -> Self {
        Self::parse()
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(name = "wardlink-dashboard")]
pub struct DashboardOptions {
    #[clap(long, short, help = "Turn on debug logging (same as RUST_LOG=debug)")]
    pub debug: bool,

    #[clap(flatten)]
    pub device: DeviceArgs,
}

impl DashboardOptions {
    pub fn load() -> Self {
        Self::parse()
    }
}
