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

// src/client/consumer.rs
// The client's background consuming task.
//
// One per client. It loops while the transport is connected, waiting up
// to POLL_INTERVAL per iteration for a delivery, and files each delivery
// into its topic's buffer. It only ever stops because the session ended
// or because it received its own stop signal (see crate::shutdown).

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, info};

use crate::client::subscriptions::SubscriptionTable;
use crate::client::timeouts::POLL_INTERVAL;
use crate::message_types::RawMessage;
use crate::shutdown::{ConsumerExit, ConsumerHandle, is_init_sentinel, is_stop_signal};
use crate::stats::RoutingStatsTracker;
use crate::transport::Transport;

pub(crate) struct Consumer {
    pub client_id: String,
    pub transport: Arc<dyn Transport>,
    pub subscriptions: Arc<SubscriptionTable>,
    pub stats: Arc<RoutingStatsTracker>,
}

impl Consumer {
    pub fn spawn(self) -> ConsumerHandle {
        ConsumerHandle::new(tokio::spawn(self.run()))
    }

    async fn run(self) -> ConsumerExit {
        info!(client_id = %self.client_id, "Consuming task started");

        while self.transport.is_connected() {
            let message = match timeout(POLL_INTERVAL, self.transport.recv()).await {
                // Nothing this poll; re-check the connection and go again.
                Err(_) => continue,
                Ok(None) => break,
                Ok(Some(message)) => message,
            };

            if is_stop_signal(&message, &self.client_id) {
                info!(client_id = %self.client_id, "Received stop signal, stopping consuming task");
                return ConsumerExit::StopSignal;
            }
            self.route(message);
        }

        info!(client_id = %self.client_id, "Transport disconnected, stopping consuming task");
        ConsumerExit::TransportClosed
    }

    // route files a delivery into its topic's buffer. Deliveries for a
    // topic without a buffer are dropped.
    fn route(&self, message: RawMessage) {
        if is_init_sentinel(&message) {
            debug!(topic = %message.topic, "Ignoring init sentinel");
            self.stats.increment_sentinels_ignored();
            return;
        }

        let Some(buffer) = self.subscriptions.get(&message.topic) else {
            debug!(topic = %message.topic, "No buffer for topic, dropping message");
            self.stats.increment_unknown_topic();
            return;
        };

        let bytes = message.len();
        let topic_for_log = message.topic.clone();
        if buffer.put(message).is_some() {
            debug!(topic = %topic_for_log, "Topic buffer full, overwrote oldest message");
            self.stats.increment_overwritten();
        }
        self.stats.increment_routed(bytes);
    }
}
