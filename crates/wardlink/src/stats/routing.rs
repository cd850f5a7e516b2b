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

// src/stats/routing.rs
// Routing statistics for incoming deliveries.
//
// The consuming task and the read accessors both record here. None of
// these conditions is ever reported to callers as an error (an
// overwritten or unroutable message is dropped silently) so these
// counters are the only place they become visible.

use std::sync::atomic::{AtomicUsize, Ordering};

// RoutingStats stores a snapshot of incoming message statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingStats {
    // total_routed is the count of deliveries placed in a topic buffer.
    pub total_routed: usize,
    // total_bytes_routed is the payload size of those deliveries.
    pub total_bytes_routed: usize,
    // total_overwritten is the count of unread messages displaced
    // because their topic buffer was full.
    pub total_overwritten: usize,
    // total_unknown_topic is the count of deliveries for a topic with
    // no registered buffer.
    pub total_unknown_topic: usize,
    // total_sentinels_ignored is the count of INIT sentinel payloads
    // skipped by the router.
    pub total_sentinels_ignored: usize,
    // total_read is the count of messages handed back by a get.
    pub total_read: usize,
    // total_undecodable is the count of buffered messages popped by a
    // get that turned out not to be a valid envelope of the requested
    // kind.
    pub total_undecodable: usize,
}

#[derive(Debug, Default)]
pub struct RoutingStatsTracker {
    routed_count: AtomicUsize,
    routed_bytes: AtomicUsize,
    overwritten_count: AtomicUsize,
    unknown_topic_count: AtomicUsize,
    sentinel_count: AtomicUsize,
    read_count: AtomicUsize,
    undecodable_count: AtomicUsize,
}

impl RoutingStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_routed(&self, bytes: usize) {
        self.routed_count.fetch_add(1, Ordering::Relaxed);
        self.routed_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_overwritten(&self) {
        self.overwritten_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unknown_topic(&self) {
        self.unknown_topic_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sentinels_ignored(&self) {
        self.sentinel_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_read(&self) {
        self.read_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_undecodable(&self) {
        self.undecodable_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset_counters(&self) {
        self.routed_count.store(0, Ordering::Relaxed);
        self.routed_bytes.store(0, Ordering::Relaxed);
        self.overwritten_count.store(0, Ordering::Relaxed);
        self.unknown_topic_count.store(0, Ordering::Relaxed);
        self.sentinel_count.store(0, Ordering::Relaxed);
        self.read_count.store(0, Ordering::Relaxed);
        self.undecodable_count.store(0, Ordering::Relaxed);
    }

    pub fn to_stats(&self) -> RoutingStats {
        RoutingStats {
            total_routed: self.routed_count.load(Ordering::Relaxed),
            total_bytes_routed: self.routed_bytes.load(Ordering::Relaxed),
            total_overwritten: self.overwritten_count.load(Ordering::Relaxed),
            total_unknown_topic: self.unknown_topic_count.load(Ordering::Relaxed),
            total_sentinels_ignored: self.sentinel_count.load(Ordering::Relaxed),
            total_read: self.read_count.load(Ordering::Relaxed),
            total_undecodable: self.undecodable_count.load(Ordering::Relaxed),
        }
    }
}
