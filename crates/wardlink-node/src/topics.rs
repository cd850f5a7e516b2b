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

// src/topics.rs
// Topics the LED node and the dashboard agree on.

// LED_STATE_TOPIC carries the LED node's on/off decision as a bool.
pub const LED_STATE_TOPIC: &str = "local/signal/led";

// LED_REQUEST_TOPIC asks the LED node to re-send its decision now.
pub const LED_REQUEST_TOPIC: &str = "local/update/led";
