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

// src/client/options.rs
// Configuration options for the wardlink client.
//
// These shape the session and local buffering. The operation timeouts
// are deliberately not here; they are fixed (see client::timeouts).

use std::time::Duration;

use crate::buffer::DEFAULT_BUFFER_CAPACITY;

pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_CHANNEL_CAPACITY: usize = 10;
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

// ClientOptions are optional parameters that can be passed to the
// client, all of which have default fallbacks.
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    // keep_alive sets the keepalive used for the broker session.
    // Defaults to DEFAULT_KEEP_ALIVE.
    pub keep_alive: Option<Duration>,
    // request_channel_capacity is the number of outgoing requests the
    // MQTT client queues before refusing more.
    // Defaults to DEFAULT_REQUEST_CHANNEL_CAPACITY.
    pub request_channel_capacity: Option<usize>,
    // inbox_capacity is the number of deliveries held between the
    // transport and the consuming task before the transport drops.
    // Defaults to DEFAULT_INBOX_CAPACITY.
    pub inbox_capacity: Option<usize>,
    // buffer_capacity is how many unread messages each subscribed
    // topic retains. Defaults to DEFAULT_BUFFER_CAPACITY.
    pub buffer_capacity: Option<usize>,
    // credentials are handed to the broker as-is; the client does
    // nothing else with them.
    pub credentials: Option<ClientCredentials>,
}

impl ClientOptions {
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = Some(keep_alive);
        self
    }

    pub fn with_request_channel_capacity(mut self, capacity: usize) -> Self {
        self.request_channel_capacity = Some(capacity);
        self
    }

    pub fn with_inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = Some(capacity);
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(ClientCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn keep_alive(&self) -> Duration {
        self.keep_alive.unwrap_or(DEFAULT_KEEP_ALIVE)
    }

    pub fn request_channel_capacity(&self) -> usize {
        self.request_channel_capacity
            .unwrap_or(DEFAULT_REQUEST_CHANNEL_CAPACITY)
    }

    pub fn inbox_capacity(&self) -> usize {
        self.inbox_capacity.unwrap_or(DEFAULT_INBOX_CAPACITY)
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity.unwrap_or(DEFAULT_BUFFER_CAPACITY)
    }
}

// ClientCredentials are used for providing a username
// and password to the MQTT server.
#[derive(Clone, Debug)]
pub struct ClientCredentials {
    pub username: String,
    pub password: String,
}
