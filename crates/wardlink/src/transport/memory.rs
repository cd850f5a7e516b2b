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

// src/transport/memory.rs
// In-process broker and the transport that talks to it.
//
// MemoryBroker routes publishes to every session subscribed to the exact
// topic, including the publishing session itself (as an MQTT broker
// would). It also keeps a log of everything published so callers can
// inspect exactly what went over the "wire".
//
// A few switches simulate broker trouble: going offline refuses new
// connections, going unresponsive leaves subscribe/publish
// unacknowledged forever, and drop_all_sessions ends every live session
// the way a broker restart would.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rumqttc::QoS;
use tokio::sync::mpsc;
use tracing::debug;

use crate::errors::WardlinkClientError;
use crate::message_types::RawMessage;
use crate::transport::Transport;

type SessionId = u64;

#[derive(Default)]
struct BrokerState {
    next_session: SessionId,
    sessions: HashMap<SessionId, mpsc::UnboundedSender<RawMessage>>,
    subscriptions: HashMap<String, HashSet<SessionId>>,
    published: Vec<RawMessage>,
    offline: bool,
    unresponsive: bool,
}

// MemoryBroker is cheap to clone; clones share the same broker.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // transport creates a new, unconnected transport attached to this
    // broker.
    pub fn transport(&self) -> MemoryTransport {
        MemoryTransport {
            broker: self.clone(),
            session: Mutex::new(None),
            inbox: tokio::sync::Mutex::new(None),
        }
    }

    // set_offline makes new connects fail. Existing sessions stay up.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    // set_unresponsive makes subscribe and publish requests hang
    // without ever being acknowledged.
    pub fn set_unresponsive(&self, unresponsive: bool) {
        self.lock().unresponsive = unresponsive;
    }

    // drop_all_sessions ends every live session. Their transports report
    // disconnected and their receivers drain and then end.
    pub fn drop_all_sessions(&self) {
        let mut state = self.lock();
        state.sessions.clear();
        state.subscriptions.clear();
    }

    // published returns every message published so far, in order.
    pub fn published(&self) -> Vec<RawMessage> {
        self.lock().published.clone()
    }

    // published_on returns the published payloads for one topic.
    pub fn published_on(&self, topic: &str) -> Vec<Vec<u8>> {
        self.lock()
            .published
            .iter()
            .filter(|message| message.topic == topic)
            .map(|message| message.payload.clone())
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock()
            .subscriptions
            .get(topic)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    fn open_session(&self) -> Result<(SessionId, mpsc::UnboundedReceiver<RawMessage>), WardlinkClientError> {
        let mut state = self.lock();
        if state.offline {
            return Err(WardlinkClientError::ConnectionRejected(
                "broker offline".to_string(),
            ));
        }
        let id = state.next_session;
        state.next_session += 1;
        let (tx, rx) = mpsc::unbounded_channel();
        state.sessions.insert(id, tx);
        Ok((id, rx))
    }

    fn close_session(&self, id: SessionId) {
        let mut state = self.lock();
        state.sessions.remove(&id);
        for subscribers in state.subscriptions.values_mut() {
            subscribers.remove(&id);
        }
    }

    fn is_live(&self, id: SessionId) -> bool {
        self.lock().sessions.contains_key(&id)
    }

    fn is_unresponsive(&self) -> bool {
        self.lock().unresponsive
    }

    fn add_subscription(&self, id: SessionId, topic: &str) -> Result<(), WardlinkClientError> {
        let mut state = self.lock();
        if !state.sessions.contains_key(&id) {
            return Err(WardlinkClientError::NotConnected);
        }
        state
            .subscriptions
            .entry(topic.to_string())
            .or_default()
            .insert(id);
        Ok(())
    }

    fn route(&self, id: SessionId, topic: &str, payload: Vec<u8>) -> Result<(), WardlinkClientError> {
        let mut state = self.lock();
        if !state.sessions.contains_key(&id) {
            return Err(WardlinkClientError::NotConnected);
        }
        let message = RawMessage::new(topic, payload);
        if let Some(subscribers) = state.subscriptions.get(topic) {
            for subscriber in subscribers {
                if let Some(tx) = state.sessions.get(subscriber) {
                    let _ = tx.send(message.clone());
                }
            }
        }
        state.published.push(message);
        Ok(())
    }
}

// MemoryTransport is one client's connection to a MemoryBroker.
pub struct MemoryTransport {
    broker: MemoryBroker,
    session: Mutex<Option<SessionId>>,
    inbox: tokio::sync::Mutex<Option<mpsc::UnboundedReceiver<RawMessage>>>,
}

impl MemoryTransport {
    fn lock_session(&self) -> MutexGuard<'_, Option<SessionId>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live_session(&self) -> Result<SessionId, WardlinkClientError> {
        let id = (*self.lock_session()).ok_or(WardlinkClientError::NotConnected)?;
        if self.broker.is_live(id) {
            Ok(id)
        } else {
            Err(WardlinkClientError::NotConnected)
        }
    }

    // stall parks the caller forever while the broker is unresponsive;
    // the client's timeout is what ends the wait.
    async fn stall_if_unresponsive(&self) {
        if self.broker.is_unresponsive() {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn connect(&self) -> Result<(), WardlinkClientError> {
        let (id, rx) = self.broker.open_session()?;
        let previous = self.lock_session().replace(id);
        if let Some(previous) = previous {
            self.broker.close_session(previous);
        }
        *self.inbox.lock().await = Some(rx);
        debug!(session = id, "Memory transport connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), WardlinkClientError> {
        let id = self.lock_session().take();
        if let Some(id) = id {
            self.broker.close_session(id);
            debug!(session = id, "Memory transport disconnected");
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str, _qos: QoS) -> Result<(), WardlinkClientError> {
        let id = self.live_session()?;
        self.stall_if_unresponsive().await;
        self.broker.add_subscription(id, topic)
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        _qos: QoS,
    ) -> Result<(), WardlinkClientError> {
        let id = self.live_session()?;
        self.stall_if_unresponsive().await;
        self.broker.route(id, topic, payload)
    }

    async fn recv(&self) -> Option<RawMessage> {
        let mut inbox = self.inbox.lock().await;
        inbox.as_mut()?.recv().await
    }

    fn is_connected(&self) -> bool {
        self.live_session().is_ok()
    }
}
