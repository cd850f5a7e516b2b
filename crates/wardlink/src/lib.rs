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

// src/lib.rs
// Main exports for the wardlink edge messaging library.

pub mod buffer;
pub mod client;
pub mod envelope;
pub mod errors;
pub mod identity;
pub mod message_types;
pub mod shutdown;
pub mod stats;
pub mod transport;

// Export some things for convenience.
pub use buffer::{DEFAULT_BUFFER_CAPACITY, TopicBuffer};
pub use client::{ClientOptions, ConnectionState, MessagingClient};
pub use envelope::{Envelope, EnvelopeValue, Payload, Reading};
pub use errors::WardlinkClientError;
pub use identity::DeviceIdentity;
pub use message_types::RawMessage;
pub use rumqttc::QoS;
pub use stats::{PublishStats, RoutingStats};
pub use transport::{MemoryBroker, MemoryTransport, MqttTransport, Transport};
