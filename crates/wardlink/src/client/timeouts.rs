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

// src/client/timeouts.rs
// Fixed operation timeouts. These are part of the node contract and are
// not configurable at runtime.

use std::time::Duration;

// CONNECT_TIMEOUT bounds waiting for the broker to acknowledge a new
// session.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
pub const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(2);
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);
pub const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// POLL_INTERVAL is how long the consuming task waits per receive.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

// STOP_GRACE is how long disconnect waits for the consuming task to act
// on its stop signal before aborting it. The signal is seen within one
// poll; the second poll is slack.
pub const STOP_GRACE: Duration = Duration::from_secs(4);
