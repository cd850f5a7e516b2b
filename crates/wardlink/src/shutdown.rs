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

// src/shutdown.rs
// In-band shutdown for the consuming task.
//
// The consuming task spends nearly all its time parked in a
// receive-with-timeout. Flipping a flag from outside would only be seen
// after the poll expires, and a transport-level disconnect isn't
// something that wakes it either. So every client subscribes to a
// reserved topic on connect, and disconnect publishes the client's own id
// there. The task is already waiting for exactly that delivery, sees it
// within one poll, and ends its own loop.
//
// The task's JoinHandle is the completion signal: it resolves exactly
// once, when the loop has returned.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::message_types::RawMessage;

// SHUTDOWN_TOPIC is subscribed by every client on connect and carries
// only stop signals (payload = the addressed client's id).
pub const SHUTDOWN_TOPIC: &str = "node_end";

// INIT_SENTINEL is a payload the router ignores on any topic.
pub const INIT_SENTINEL: &str = "INIT";

// is_stop_signal is true for a message telling `client_id` to stop.
// Stop signals for other clients sharing the broker are not ours.
pub fn is_stop_signal(message: &RawMessage, client_id: &str) -> bool {
    message.topic == SHUTDOWN_TOPIC && message.payload_eq(client_id)
}

pub fn is_init_sentinel(message: &RawMessage) -> bool {
    message.payload_eq(INIT_SENTINEL)
}

// ConsumerExit says why a consuming task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerExit {
    // StopSignal means the task saw its own id on SHUTDOWN_TOPIC.
    StopSignal,
    // TransportClosed means the session ended underneath it.
    TransportClosed,
}

// ConsumerHandle owns a running consuming task.
#[derive(Debug)]
pub struct ConsumerHandle {
    join: JoinHandle<ConsumerExit>,
}

impl ConsumerHandle {
    pub fn new(join: JoinHandle<ConsumerExit>) -> Self {
        Self { join }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    // join waits up to `grace` for the task to stop on its own. If it
    // overruns (e.g. the stop signal was never delivered) it is aborted.
    // Returns how the task stopped, or None if it had to be aborted or
    // panicked.
    pub async fn join(mut self, grace: Duration) -> Option<ConsumerExit> {
        match tokio::time::timeout(grace, &mut self.join).await {
            Ok(Ok(exit)) => {
                info!(?exit, "Consuming task stopped");
                Some(exit)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Consuming task ended abnormally");
                None
            }
            Err(_) => {
                warn!(?grace, "Consuming task did not stop in time, aborting it");
                self.join.abort();
                let _ = self.join.await;
                None
            }
        }
    }

    // abort stops the task without waiting. Used when the client is
    // dropped without a disconnect.
    pub fn abort(&self) {
        self.join.abort();
    }
}
