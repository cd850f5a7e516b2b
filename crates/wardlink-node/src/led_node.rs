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

// src/led_node.rs
// The LED controller node.
//
// Reads camera frames, decides per frame whether the LEDs should be on,
// and publishes that decision on LED_STATE_TOPIC. A decision goes out
// when it changes, when someone asks for it on LED_REQUEST_TOPIC, and
// otherwise at least once per signal period so late joiners catch up.

use std::time::Duration;

use eyre::WrapErr;
use tokio::time::{Instant, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wardlink::{DeviceIdentity, MessagingClient};

use crate::config::{LED_NODE_APP_NAME, LedNodeOptions};
use crate::frames::{FrameSource, open_frame_stream};
use crate::topics::{LED_REQUEST_TOPIC, LED_STATE_TOPIC};

#[derive(Clone, Debug)]
pub struct LedNodeSettings {
    // threshold is the mean brightness below which the LEDs go on.
    pub threshold: f64,
    pub signal_period: Duration,
    // capture_wait is how long to wait for a frame before giving up on
    // the camera.
    pub capture_wait: Duration,
}

impl From<&LedNodeOptions> for LedNodeSettings {
    fn from(options: &LedNodeOptions) -> Self {
        Self {
            threshold: options.threshold,
            signal_period: options.signal_period,
            capture_wait: options.capture_wait,
        }
    }
}

// SignalScheduler decides when a decision has to be (re)sent.
#[derive(Debug)]
pub struct SignalScheduler {
    period: Duration,
    // last_sent is when the last decision went out, and what it was.
    last_sent: Option<(Instant, bool)>,
}

impl SignalScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_sent: None,
        }
    }

    // should_send is true for the very first decision, a changed
    // decision, an explicit request, or once the period has run out.
    pub fn should_send(&self, now: Instant, decision: bool, requested: bool) -> bool {
        match self.last_sent {
            None => true,
            Some((at, last)) => {
                requested || last != decision || now.saturating_duration_since(at) > self.period
            }
        }
    }

    pub fn record_sent(&mut self, now: Instant, decision: bool) {
        self.last_sent = Some((now, decision));
    }

    pub fn last_decision(&self) -> Option<bool> {
        self.last_sent.map(|(_, decision)| decision)
    }
}

// StopReason says why the frame loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    // CaptureTimeout means no frame arrived within capture_wait.
    CaptureTimeout,
    EndOfStream,
}

// run_led_node drives the frame loop until cancelled or the camera goes
// quiet. The client must already be connected and subscribed to
// LED_REQUEST_TOPIC.
pub async fn run_led_node<S: FrameSource>(
    client: &MessagingClient,
    identity: &DeviceIdentity,
    source: &mut S,
    settings: &LedNodeSettings,
    cancel: CancellationToken,
) -> eyre::Result<StopReason> {
    let client_id = identity.client_id();
    let mut scheduler = SignalScheduler::new(settings.signal_period);

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Cancelled, stopping LED node");
                return Ok(StopReason::Cancelled);
            }
            next = timeout(settings.capture_wait, source.next_frame()) => next,
        };

        let frame = match next {
            Err(_) => {
                warn!(capture_wait = ?settings.capture_wait, "Camera is not streaming, stopping LED node");
                return Ok(StopReason::CaptureTimeout);
            }
            Ok(Ok(None)) => {
                info!("Input stream ended, stopping LED node");
                return Ok(StopReason::EndOfStream);
            }
            Ok(Ok(Some(frame))) => frame,
            Ok(Err(e)) => return Err(e),
        };

        let decision = frame.led_signal(settings.threshold);
        // Always drain the request, even if we'd send anyway.
        let requested = client.get_bool(LED_REQUEST_TOPIC).is_some();
        let now = Instant::now();
        if !scheduler.should_send(now, decision, requested) {
            continue;
        }

        debug!(decision, requested, "Sending LED decision");
        match client
            .publish(decision, &client_id, &identity.room, &identity.bed, LED_STATE_TOPIC)
            .await
        {
            Ok(()) => scheduler.record_sent(now, decision),
            Err(e) => warn!(error = %e, "Could not publish LED decision"),
        }
    }
}

// start opens the frame stream, connects, and runs the node until it
// stops. The client is disconnected on the way out whatever happened.
pub async fn start(options: LedNodeOptions, cancel: CancellationToken) -> eyre::Result<StopReason> {
    let identity = options.device.identity(LED_NODE_APP_NAME);
    let settings = LedNodeSettings::from(&options);
    info!(client_id = %identity, options = ?options, "Starting LED node");

    let mut source = open_frame_stream(&options.input, options.width, options.height).await?;

    let client = MessagingClient::new(&options.device.broker, identity.client_id())?;
    client.connect().await.wrap_err_with(|| {
        format!(
            "Room {} Bed {} failed to connect to MQTT broker at {}",
            identity.room, identity.bed, options.device.broker
        )
    })?;
    if let Err(e) = client.subscribe(LED_REQUEST_TOPIC).await {
        warn!(error = %e, "Could not subscribe to LED requests, only periodic updates will be sent");
    }

    let result = run_led_node(&client, &identity, &mut source, &settings, cancel).await;

    if let Err(e) = client.disconnect().await {
        warn!(error = %e, "Disconnect did not complete cleanly");
    }
    result
}
