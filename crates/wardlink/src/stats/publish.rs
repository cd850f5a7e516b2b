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

// src/stats/publish.rs
// Publish statistics for outgoing envelopes.
//
// Atomic counters only, so recording a publish never contends with the
// publish lock itself.

use std::sync::atomic::{AtomicUsize, Ordering};

// PublishStats stores a snapshot of outgoing message statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishStats {
    // total_published is the count of publishes the broker acknowledged.
    pub total_published: usize,
    // total_failed is the count of publishes that were rejected, timed
    // out, or attempted while disconnected.
    pub total_failed: usize,
    // total_timed_out is the subset of total_failed that ran out the
    // publish acknowledgement window.
    pub total_timed_out: usize,
    // total_bytes_published is the payload size of acknowledged publishes.
    pub total_bytes_published: usize,
}

#[derive(Debug, Default)]
pub struct PublishStatsTracker {
    published_count: AtomicUsize,
    failed_count: AtomicUsize,
    timed_out_count: AtomicUsize,
    published_bytes: AtomicUsize,
}

impl PublishStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // increment_published records an acknowledged publish of `bytes`.
    pub fn increment_published(&self, bytes: usize) {
        self.published_count.fetch_add(1, Ordering::Relaxed);
        self.published_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    // increment_timed_out records a publish that was never acknowledged.
    // Counts as a failure too.
    pub fn increment_timed_out(&self) {
        self.timed_out_count.fetch_add(1, Ordering::Relaxed);
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset_counters(&self) {
        self.published_count.store(0, Ordering::Relaxed);
        self.failed_count.store(0, Ordering::Relaxed);
        self.timed_out_count.store(0, Ordering::Relaxed);
        self.published_bytes.store(0, Ordering::Relaxed);
    }

    pub fn to_stats(&self) -> PublishStats {
        PublishStats {
            total_published: self.published_count.load(Ordering::Relaxed),
            total_failed: self.failed_count.load(Ordering::Relaxed),
            total_timed_out: self.timed_out_count.load(Ordering::Relaxed),
            total_bytes_published: self.published_bytes.load(Ordering::Relaxed),
        }
    }
}
