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

// src/buffer.rs
// Bounded per-topic ring buffer.
//
// TopicBuffer keeps the most recent N items for one topic. Writers never
// block: when the ring is full the oldest unread item is overwritten, so a
// slow reader only ever sees the latest few updates instead of a backlog.

use std::sync::{Mutex, MutexGuard, PoisonError};

// DEFAULT_BUFFER_CAPACITY is the number of messages retained per
// subscribed topic unless ClientOptions says otherwise.
pub const DEFAULT_BUFFER_CAPACITY: usize = 5;

// TopicBuffer is a fixed-capacity, thread-safe ring. Capacity is
// immutable after creation.
#[derive(Debug)]
pub struct TopicBuffer<T> {
    ring: Mutex<Ring<T>>,
    capacity: usize,
}

// Ring holds the head/tail/full triple that every state query is
// derived from. It is only ever touched under the TopicBuffer lock.
#[derive(Debug)]
struct Ring<T> {
    // slots is allocated once; None marks a slot with nothing unread.
    slots: Vec<Option<T>>,
    // head is the next write position.
    head: usize,
    // tail is the oldest unread position.
    tail: usize,
    // full disambiguates head == tail.
    full: bool,
}

impl<T> Ring<T> {
    fn len(&self) -> usize {
        let capacity = self.slots.len();
        if self.full {
            capacity
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            capacity + self.head - self.tail
        }
    }

    fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }
}

impl<T> TopicBuffer<T> {
    // new allocates a ring with room for `capacity` items. A capacity
    // of zero would make every put a silent no-op, so it is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            ring: Mutex::new(Ring {
                slots,
                head: 0,
                tail: 0,
                full: false,
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        // A panic while holding the lock cannot leave the triple
        // half-updated in a way later calls can't cope with.
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // put writes an item at the head. When the ring is already full the
    // oldest unread item is displaced and handed back to the caller
    // (mostly so it can be counted); otherwise returns None.
    pub fn put(&self, item: T) -> Option<T> {
        let mut ring = self.lock();
        let head = ring.head;
        let displaced = ring.slots[head].replace(item);
        let displaced = if ring.full {
            ring.tail = (ring.tail + 1) % self.capacity;
            displaced
        } else {
            None
        };
        ring.head = (head + 1) % self.capacity;
        ring.full = ring.head == ring.tail;
        displaced
    }

    // get removes and returns the oldest unread item, or None if there is
    // nothing to read. Never blocks waiting for a writer.
    pub fn get(&self) -> Option<T> {
        let mut ring = self.lock();
        if ring.is_empty() {
            return None;
        }
        let tail = ring.tail;
        let item = ring.slots[tail].take();
        ring.full = false;
        ring.tail = (tail + 1) % self.capacity;
        item
    }

    // reset drops everything unread without reallocating the slots.
    pub fn reset(&self) {
        let mut ring = self.lock();
        for slot in ring.slots.iter_mut() {
            *slot = None;
        }
        ring.head = ring.tail;
        ring.full = false;
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().full
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Default for TopicBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}
