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
// Edge nodes built on the wardlink client: the camera-driven LED
// controller and the operator dashboard.

pub mod brightness;
pub mod config;
pub mod dashboard;
pub mod frames;
pub mod led_node;
pub mod logging;
pub mod signals;
pub mod topics;

pub use config::{DashboardOptions, DeviceArgs, LedNodeOptions};
