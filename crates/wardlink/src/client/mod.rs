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

// src/client/mod.rs
// Client module exports.

mod consumer;
mod core;
mod options;
mod subscriptions;
pub mod timeouts;
mod topics;

pub use core::{ConnectionState, MessagingClient};

pub use options::{ClientCredentials, ClientOptions};
pub use subscriptions::{MessageBuffer, SubscriptionTable};
pub use topics::Topics;
