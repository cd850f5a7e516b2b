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

// src/brightness.rs
// LED decision from frame brightness.

// DEFAULT_BRIGHTNESS_THRESHOLD is on the 0-255 grayscale. Frames darker
// than this on average turn the LEDs on.
pub const DEFAULT_BRIGHTNESS_THRESHOLD: f64 = 40.0;

// mean_brightness averages 8-bit grayscale pixels. None for an empty
// frame.
pub fn mean_brightness(pixels: &[u8]) -> Option<f64> {
    if pixels.is_empty() {
        return None;
    }
    let sum: u64 = pixels.iter().map(|&p| u64::from(p)).sum();
    Some(sum as f64 / pixels.len() as f64)
}

// led_signal is true when the LEDs should be on. An empty frame carries
// no evidence either way and leaves them off.
pub fn led_signal(pixels: &[u8], threshold: f64) -> bool {
    mean_brightness(pixels).is_some_and(|mean| mean < threshold)
}
