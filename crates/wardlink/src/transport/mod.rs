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

// src/transport/mod.rs
// The broker seam.
//
// MessagingClient never talks to rumqttc directly; it drives a Transport.
// MqttTransport is the real one. MemoryTransport connects clients through
// an in-process MemoryBroker, which is what the tests (and anything wiring
// nodes together inside one process) use.
//
// Transports don't apply the client's fixed timeouts themselves. Every
// call resolves when the broker answers (or the session dies) and the
// client bounds the wait.

use std::sync::Arc;

use async_trait::async_trait;
use rumqttc::QoS;

use crate::errors::WardlinkClientError;
use crate::message_types::RawMessage;

mod memory;
mod mqtt;

pub use memory::{MemoryBroker, MemoryTransport};
pub use mqtt::{MqttTransport, parse_broker_address};

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    // connect opens a fresh session and resolves once the broker has
    // acknowledged (Ok) or refused (Err) it.
    async fn connect(&self) -> Result<(), WardlinkClientError>;

    // disconnect closes the session and resolves once it is confirmed
    // gone. A transport that isn't connected just drops whatever
    // half-open session it has.
    async fn disconnect(&self) -> Result<(), WardlinkClientError>;

    // subscribe resolves when the broker acknowledges the subscription.
    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), WardlinkClientError>;

    // publish resolves when the broker has completed the delivery
    // handshake for `qos`.
    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
    ) -> Result<(), WardlinkClientError>;

    // recv waits for the next delivery on any subscribed topic. Returns
    // None once the session has ended (or was never opened). Only one
    // caller, the client's consuming task, ever receives.
    async fn recv(&self) -> Option<RawMessage>;

    fn is_connected(&self) -> bool;
}

#[async_trait]
impl<T: Transport> Transport for Arc<T> {
    async fn connect(&self) -> Result<(), WardlinkClientError> {
        T::connect(self).await
    }

    async fn disconnect(&self) -> Result<(), WardlinkClientError> {
        T::disconnect(self).await
    }

    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), WardlinkClientError> {
        T::subscribe(self, topic, qos).await
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
    ) -> Result<(), WardlinkClientError> {
        T::publish(self, topic, payload, qos).await
    }

    async fn recv(&self) -> Option<RawMessage> {
        T::recv(self).await
    }

    fn is_connected(&self) -> bool {
        T::is_connected(self)
    }
}
