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

// src/errors.rs
// Error taxonomy for the wardlink client.
//
// Public client operations return these instead of panicking. Decode
// errors exist so the codec can say what went wrong, but the client's
// read accessors only ever surface them as "nothing found".

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardlinkClientError {
    // ConnectionError wraps failures handing a request to the
    // underlying MQTT client (e.g. its request channel is gone).
    #[error("MQTT client request failed: {0}")]
    ConnectionError(#[from] rumqttc::ClientError),

    #[error("broker did not acknowledge the connection within {0:?}")]
    ConnectionTimeout(Duration),

    #[error("broker rejected the connection: {0}")]
    ConnectionRejected(String),

    #[error("broker did not confirm disconnection within {0:?}")]
    DisconnectTimeout(Duration),

    #[error("client is not connected")]
    NotConnected,

    // TransportClosed is returned to anything still waiting on an
    // acknowledgement when the transport session ends underneath it.
    #[error("transport session closed before the request was acknowledged")]
    TransportClosed,

    #[error("subscription to '{topic}' was not acknowledged within {timeout:?}")]
    SubscribeTimeout { topic: String, timeout: Duration },

    #[error("subscription to '{topic}' was rejected: {reason}")]
    SubscribeRejected { topic: String, reason: String },

    #[error("publish to '{topic}' was not acknowledged within {timeout:?}")]
    PublishTimeout { topic: String, timeout: Duration },

    #[error("publish to '{topic}' failed: {reason}")]
    PublishFailed { topic: String, reason: String },

    #[error("failed to encode envelope: {0}")]
    EnvelopeEncodeError(#[from] serde_json::Error),

    #[error("failed to decode envelope: {0}")]
    EnvelopeDecodeError(serde_json::Error),

    #[error("envelope data is a {found}, expected a {expected}")]
    WrongDataKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid broker address '{0}'")]
    InvalidAddress(String),
}

impl WardlinkClientError {
    pub fn subscribe_timeout(topic: impl Into<String>, timeout: Duration) -> Self {
        Self::SubscribeTimeout {
            topic: topic.into(),
            timeout,
        }
    }

    pub fn subscribe_rejected(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SubscribeRejected {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    pub fn publish_timeout(topic: impl Into<String>, timeout: Duration) -> Self {
        Self::PublishTimeout {
            topic: topic.into(),
            timeout,
        }
    }

    pub fn publish_failed(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PublishFailed {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    pub fn wrong_data_kind(expected: &'static str, found: &'static str) -> Self {
        Self::WrongDataKind { expected, found }
    }

    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress(address.into())
    }

    // is_connection_error covers everything about establishing, holding
    // or tearing down the broker session.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(_)
                | Self::ConnectionTimeout(_)
                | Self::ConnectionRejected(_)
                | Self::DisconnectTimeout(_)
                | Self::NotConnected
                | Self::TransportClosed
                | Self::InvalidAddress(_)
        )
    }

    pub fn is_subscription_error(&self) -> bool {
        matches!(
            self,
            Self::SubscribeTimeout { .. } | Self::SubscribeRejected { .. }
        )
    }

    pub fn is_publish_error(&self) -> bool {
        matches!(
            self,
            Self::PublishTimeout { .. } | Self::PublishFailed { .. }
        )
    }

    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::EnvelopeDecodeError(_) | Self::WrongDataKind { .. }
        )
    }

    // is_timeout is true for any of the fixed-window waits expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout(_)
                | Self::DisconnectTimeout(_)
                | Self::SubscribeTimeout { .. }
                | Self::PublishTimeout { .. }
        )
    }
}
