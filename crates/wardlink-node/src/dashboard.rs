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

// src/dashboard.rs
// The operator dashboard: prints every LED decision it sees and lets the
// operator ask the LED node for its current state.

use std::time::Duration;

use eyre::WrapErr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use wardlink::{DeviceIdentity, MessagingClient, Reading};

use crate::config::{DASHBOARD_APP_NAME, DashboardOptions};
use crate::topics::{LED_REQUEST_TOPIC, LED_STATE_TOPIC};

// POLL_PERIOD is how often the state buffer is drained.
const POLL_PERIOD: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    // Status asks the LED node to re-send its decision.
    Status,
    Exit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "status" => Some(Self::Status),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

// format_led_line renders one LED decision the way the dashboard prints
// it.
pub fn format_led_line(reading: &Reading<bool>) -> String {
    format!(
        "[{}][{}]Room : {} Bed : {} Led : {}",
        reading.timestamp,
        reading.client_id,
        reading.room,
        reading.bed,
        u8::from(reading.value)
    )
}

// run_dashboard prints LED decisions to `output` and handles commands
// from `input` until cancelled or told to exit. The client must already
// be connected and subscribed to LED_STATE_TOPIC. If `input` closes the
// dashboard keeps printing.
pub async fn run_dashboard<R, W>(
    client: &MessagingClient,
    identity: &DeviceIdentity,
    input: R,
    output: &mut W,
    cancel: CancellationToken,
) -> eyre::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let client_id = identity.client_id();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut ticker = interval(POLL_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Cancelled, stopping dashboard");
                break;
            }
            line = lines.next_line(), if input_open => {
                match line.wrap_err("Error reading input")? {
                    Some(line) => match Command::parse(&line) {
                        Some(Command::Status) => {
                            if let Err(e) = client
                                .publish(true, &client_id, &identity.room, &identity.bed, LED_REQUEST_TOPIC)
                                .await
                            {
                                warn!(error = %e, "Could not send status request");
                            }
                        }
                        Some(Command::Exit) => {
                            info!("Exit requested");
                            break;
                        }
                        None => {}
                    },
                    None => {
                        info!("Input closed, dashboard keeps running until interrupted");
                        input_open = false;
                    }
                }
            }
            _ = ticker.tick() => {
                while let Some(reading) = client.get_bool(LED_STATE_TOPIC) {
                    let line = format_led_line(&reading);
                    output.write_all(line.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                }
                output.flush().await?;
            }
        }
    }

    // Whatever arrived before we were told to stop still gets shown.
    while let Some(reading) = client.get_bool(LED_STATE_TOPIC) {
        output
            .write_all(format!("{}\n", format_led_line(&reading)).as_bytes())
            .await?;
    }
    output.flush().await?;
    Ok(())
}

// start connects, runs the dashboard on stdin/stdout, and disconnects.
pub async fn start(options: DashboardOptions, cancel: CancellationToken) -> eyre::Result<()> {
    let identity = options.device.identity(DASHBOARD_APP_NAME);
    info!(client_id = %identity, broker = %options.device.broker, "Starting dashboard");

    let client = MessagingClient::new(&options.device.broker, identity.client_id())?;
    client.connect().await.wrap_err_with(|| {
        format!(
            "Room {} Bed {} failed to connect to MQTT broker at {}",
            identity.room, identity.bed, options.device.broker
        )
    })?;
    client
        .subscribe(LED_STATE_TOPIC)
        .await
        .wrap_err("Could not subscribe to LED state")?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let result = run_dashboard(&client, &identity, stdin, &mut stdout, cancel).await;

    if let Err(e) = client.disconnect().await {
        warn!(error = %e, "Disconnect did not complete cleanly");
    }
    result
}
