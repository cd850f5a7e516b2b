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

// src/client/subscriptions.rs
// Topic -> buffer table.
//
// One lock covers every lookup and insertion. Lookups hand out an Arc to
// the buffer so that the buffer's own lock, not this one, is what put/get
// hold while they work.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::buffer::TopicBuffer;
use crate::message_types::RawMessage;

pub type MessageBuffer = TopicBuffer<RawMessage>;

#[derive(Debug)]
pub struct SubscriptionTable {
    buffers: Mutex<HashMap<String, Arc<MessageBuffer>>>,
    // buffer_capacity is used for every buffer this table creates.
    buffer_capacity: usize,
}

impl SubscriptionTable {
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(HashMap::new()),
            buffer_capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<MessageBuffer>>> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ensure registers a buffer for `topic` unless one already exists.
    // An existing buffer is left untouched. Returns true if it created
    // one.
    pub fn ensure(&self, topic: &str) -> bool {
        let mut buffers = self.lock();
        if buffers.contains_key(topic) {
            return false;
        }
        buffers.insert(
            topic.to_string(),
            Arc::new(TopicBuffer::new(self.buffer_capacity)),
        );
        true
    }

    // get looks up the buffer for `topic`. A miss is just None; nothing
    // gets created on the read path.
    pub fn get(&self, topic: &str) -> Option<Arc<MessageBuffer>> {
        self.lock().get(topic).cloned()
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.lock().keys().cloned().collect();
        topics.sort();
        topics
    }
}
