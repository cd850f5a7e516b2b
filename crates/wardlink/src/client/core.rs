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

// src/client/core.rs
// MessagingClient: connection lifecycle, subscriptions, publishing and
// reading for one device identity.
//
// All operations are independently atomic and report failure as an Err
// (or, for reads, as None); nothing here retries. The only background
// work is the consuming task, started on the first subscription (which
// connect itself makes, for the shutdown topic) and stopped by
// disconnect through the in-band stop signal.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rumqttc::QoS;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::client::consumer::Consumer;
use crate::client::options::ClientOptions;
use crate::client::subscriptions::SubscriptionTable;
use crate::client::timeouts::{
    CONNECT_TIMEOUT, DISCONNECT_TIMEOUT, PUBLISH_TIMEOUT, STOP_GRACE, SUBSCRIBE_TIMEOUT,
};
use crate::client::topics::Topics;
use crate::envelope::{Envelope, EnvelopeValue, Payload, Reading};
use crate::errors::WardlinkClientError;
use crate::shutdown::{ConsumerHandle, SHUTDOWN_TOPIC};
use crate::stats::{PublishStats, PublishStatsTracker, RoutingStats, RoutingStatsTracker};
use crate::transport::{MqttTransport, Transport};

// QOS is requested for every subscription and publish.
const QOS: QoS = QoS::ExactlyOnce;

// ConnectionState is the client's view of its broker session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

pub struct MessagingClient {
    // client_id is this client's identity on the broker, and the payload
    // of its stop signal.
    client_id: String,
    transport: Arc<dyn Transport>,
    subscriptions: Arc<SubscriptionTable>,
    // consumer is the running consuming task, if any. Held across awaits
    // in disconnect, hence the async lock.
    consumer: tokio::sync::Mutex<Option<ConsumerHandle>>,
    // consumer_spawns counts consuming tasks ever started.
    consumer_spawns: AtomicUsize,
    // publish_lock serializes every outgoing send.
    publish_lock: tokio::sync::Mutex<()>,
    state: Mutex<ConnectionState>,
    publish_stats: PublishStatsTracker,
    routing_stats: Arc<RoutingStatsTracker>,
}

impl std::fmt::Debug for MessagingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingClient")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl MessagingClient {
    // new creates a client for the MQTT broker at `address`
    // ("host[:port]"). Nothing is opened until connect.
    pub fn new(address: &str, client_id: impl Into<String>) -> Result<Self, WardlinkClientError> {
        Self::with_options(address, client_id, ClientOptions::default())
    }

    pub fn with_options(
        address: &str,
        client_id: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, WardlinkClientError> {
        let client_id = client_id.into();
        let transport = MqttTransport::new(address, &client_id, &options)?;
        Ok(Self::with_transport(transport, client_id, options))
    }

    // with_transport creates a client over any Transport (e.g. a
    // MemoryTransport).
    pub fn with_transport(
        transport: impl Transport,
        client_id: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            transport: Arc::new(transport),
            subscriptions: Arc::new(SubscriptionTable::new(options.buffer_capacity())),
            consumer: tokio::sync::Mutex::new(None),
            consumer_spawns: AtomicUsize::new(0),
            publish_lock: tokio::sync::Mutex::new(()),
            state: Mutex::new(ConnectionState::Disconnected),
            publish_stats: PublishStatsTracker::new(),
            routing_stats: Arc::new(RoutingStatsTracker::new()),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: ConnectionState) {
        *self.lock_state() = state;
    }

    // connection_state reports the lifecycle state, downgraded to
    // Disconnected if the session has died underneath a Connected client.
    pub fn connection_state(&self) -> ConnectionState {
        let state = *self.lock_state();
        if state == ConnectionState::Connected && !self.transport.is_connected() {
            ConnectionState::Disconnected
        } else {
            state
        }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    // connect opens the broker session (waiting up to CONNECT_TIMEOUT for
    // it to be acknowledged) and subscribes to the shutdown topic. Already
    // connected is success.
    pub async fn connect(&self) -> Result<(), WardlinkClientError> {
        if self.transport.is_connected() {
            info!(client_id = %self.client_id, "Client is already connected");
            return Ok(());
        }

        self.set_state(ConnectionState::Connecting);

        // A consuming task from a lost session may still be on its way
        // out. It has to be gone before the shutdown-topic subscribe
        // below, or that subscribe would see it alive and start none.
        self.retire_consumer().await;

        let result = match timeout(CONNECT_TIMEOUT, self.transport.connect()).await {
            Ok(result) => result,
            Err(_) => {
                // Drop the half-open session so it can't complete later.
                let _ = timeout(DISCONNECT_TIMEOUT, self.transport.disconnect()).await;
                Err(WardlinkClientError::ConnectionTimeout(CONNECT_TIMEOUT))
            }
        };
        if let Err(e) = result {
            error!(client_id = %self.client_id, error = %e, "Could not connect to broker");
            self.set_state(ConnectionState::Disconnected);
            return Err(e);
        }
        self.set_state(ConnectionState::Connected);

        if let Err(e) = self.subscribe_topic(SHUTDOWN_TOPIC, false).await {
            error!(client_id = %self.client_id, error = %e, "Could not subscribe to shutdown topic");
            return Err(e);
        }

        info!(client_id = %self.client_id, "Successfully connected to broker");
        Ok(())
    }

    // subscribe subscribes to `topic` and makes sure it has a buffer. An
    // existing buffer (and whatever is unread in it) is kept.
    pub async fn subscribe(&self, topic: &str) -> Result<(), WardlinkClientError> {
        self.subscribe_topic(topic, true).await
    }

    // subscribe_all subscribes to each topic in order, stopping at the
    // first failure. Subscriptions made before the failure stay.
    pub async fn subscribe_all(&self, topics: impl Into<Topics>) -> Result<(), WardlinkClientError> {
        let topics = topics.into();
        debug!(%topics, "Subscribing to topics");
        for topic in topics.into_vec() {
            self.subscribe(&topic).await?;
        }
        Ok(())
    }

    // subscribe_topic is subscribe, optionally without a buffer (the
    // shutdown topic is only ever looked at by the consuming task).
    async fn subscribe_topic(&self, topic: &str, buffered: bool) -> Result<(), WardlinkClientError> {
        if !self.transport.is_connected() {
            warn!(topic, "Client is not connected, cannot subscribe");
            return Err(WardlinkClientError::NotConnected);
        }

        self.ensure_consumer().await;

        match timeout(SUBSCRIBE_TIMEOUT, self.transport.subscribe(topic, QOS)).await {
            Ok(Ok(())) => {
                if buffered && self.subscriptions.ensure(topic) {
                    debug!(topic, "Created topic buffer");
                }
                info!(topic, "Subscribed to topic");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(topic, error = %e, "Subscribe failed");
                Err(e)
            }
            Err(_) => {
                warn!(topic, "Subscribe was not acknowledged in time");
                Err(WardlinkClientError::subscribe_timeout(topic, SUBSCRIBE_TIMEOUT))
            }
        }
    }

    // ensure_consumer starts the consuming task unless one is running.
    async fn ensure_consumer(&self) {
        let mut consumer = self.consumer.lock().await;
        if consumer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        *consumer = Some(
            Consumer {
                client_id: self.client_id.clone(),
                transport: self.transport.clone(),
                subscriptions: self.subscriptions.clone(),
                stats: self.routing_stats.clone(),
            }
            .spawn(),
        );
        self.consumer_spawns.fetch_add(1, Ordering::Relaxed);
    }

    // retire_consumer joins a consuming task left over from a previous
    // session. Only called while the transport is not connected, so the
    // task is already stopping on its own.
    async fn retire_consumer(&self) {
        let stale = self.consumer.lock().await.take();
        if let Some(stale) = stale {
            debug!(client_id = %self.client_id, "Waiting for previous consuming task to stop");
            stale.join(STOP_GRACE).await;
        }
    }

    // publish wraps `value` in an envelope stamped now and sends it to
    // `topic`.
    pub async fn publish(
        &self,
        value: impl Into<Payload>,
        client_id: &str,
        room: &str,
        bed: &str,
        topic: &str,
    ) -> Result<(), WardlinkClientError> {
        let envelope = Envelope::now(value, client_id, room, bed);
        self.publish_envelope(&envelope, topic).await
    }

    pub async fn publish_envelope(
        &self,
        envelope: &Envelope,
        topic: &str,
    ) -> Result<(), WardlinkClientError> {
        let payload = envelope.encode().inspect_err(|_| {
            self.publish_stats.increment_failed();
        })?;
        self.publish_raw(topic, payload).await
    }

    // publish_raw sends bytes as-is, exactly once, waiting up to
    // PUBLISH_TIMEOUT for the broker to complete the handshake.
    async fn publish_raw(&self, topic: &str, payload: Vec<u8>) -> Result<(), WardlinkClientError> {
        let _send_guard = self.publish_lock.lock().await;

        if !self.transport.is_connected() {
            error!(topic, "Client is not connected, cannot publish");
            self.publish_stats.increment_failed();
            return Err(WardlinkClientError::NotConnected);
        }

        let bytes = payload.len();
        match timeout(PUBLISH_TIMEOUT, self.transport.publish(topic, payload, QOS)).await {
            Ok(Ok(())) => {
                debug!(topic, bytes, "Published message");
                self.publish_stats.increment_published(bytes);
                Ok(())
            }
            Ok(Err(e)) => {
                error!(topic, error = %e, "Publish failed");
                self.publish_stats.increment_failed();
                Err(e)
            }
            Err(_) => {
                error!(topic, "Timed out publishing message");
                self.publish_stats.increment_timed_out();
                Err(WardlinkClientError::publish_timeout(topic, PUBLISH_TIMEOUT))
            }
        }
    }

    // get pops the oldest buffered message for `topic` and decodes it as
    // an envelope carrying a T. None if there's nothing buffered, no
    // buffer for the topic, or the popped message isn't a valid envelope
    // of that kind (in which case it is gone).
    pub fn get<T: EnvelopeValue>(&self, topic: &str) -> Option<Reading<T>> {
        let buffer = self.subscriptions.get(topic)?;
        let message = buffer.get()?;

        match Envelope::decode(&message.payload).and_then(Envelope::into_reading::<T>) {
            Ok(reading) => {
                self.routing_stats.increment_read();
                Some(reading)
            }
            Err(e) => {
                debug!(topic, error = %e, "Discarding undecodable message");
                self.routing_stats.increment_undecodable();
                None
            }
        }
    }

    pub fn get_bool(&self, topic: &str) -> Option<Reading<bool>> {
        self.get(topic)
    }

    pub fn get_string(&self, topic: &str) -> Option<Reading<String>> {
        self.get(topic)
    }

    // pending is the number of unread messages buffered for `topic`.
    pub fn pending(&self, topic: &str) -> usize {
        self.subscriptions
            .get(topic)
            .map(|buffer| buffer.len())
            .unwrap_or(0)
    }

    pub fn has_pending(&self, topic: &str) -> bool {
        self.pending(topic) > 0
    }

    // subscribed_topics lists the topics with a buffer, sorted.
    pub fn subscribed_topics(&self) -> Vec<String> {
        self.subscriptions.topics()
    }

    pub async fn is_consuming(&self) -> bool {
        self.consumer
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // consumer_spawn_count is how many consuming tasks this client has
    // ever started.
    pub fn consumer_spawn_count(&self) -> usize {
        self.consumer_spawns.load(Ordering::Relaxed)
    }

    pub fn publish_stats(&self) -> PublishStats {
        self.publish_stats.to_stats()
    }

    pub fn routing_stats(&self) -> RoutingStats {
        self.routing_stats.to_stats()
    }

    // disconnect stops the consuming task (by sending it its stop
    // signal and joining it) and then closes the session, waiting up to
    // DISCONNECT_TIMEOUT for that to be confirmed. Safe to call
    // repeatedly, connected or not.
    pub async fn disconnect(&self) -> Result<(), WardlinkClientError> {
        info!(client_id = %self.client_id, "Client is disconnecting");
        self.set_state(ConnectionState::Disconnecting);

        let consumer = self.consumer.lock().await.take();
        if let Some(consumer) = consumer {
            if !consumer.is_finished() && self.transport.is_connected() {
                let stop_signal = self.client_id.clone().into_bytes();
                if let Err(e) = self.publish_raw(SHUTDOWN_TOPIC, stop_signal).await {
                    warn!(error = %e, "Could not deliver stop signal to consuming task");
                }
            }
            consumer.join(STOP_GRACE).await;
        }

        let was_connected = self.transport.is_connected();
        let result = match timeout(DISCONNECT_TIMEOUT, self.transport.disconnect()).await {
            Ok(Ok(())) if !self.transport.is_connected() => Ok(()),
            Ok(Ok(())) => Err(WardlinkClientError::DisconnectTimeout(DISCONNECT_TIMEOUT)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(WardlinkClientError::DisconnectTimeout(DISCONNECT_TIMEOUT)),
        };

        match &result {
            Ok(()) if was_connected => {
                info!(client_id = %self.client_id, "Client disconnected successfully")
            }
            Ok(()) => {}
            Err(e) => error!(client_id = %self.client_id, error = %e, "Failed to disconnect from broker"),
        }

        self.set_state(if self.transport.is_connected() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        });
        result
    }
}

impl Drop for MessagingClient {
    fn drop(&mut self) {
        if let Some(consumer) = self.consumer.get_mut().take() {
            if !consumer.is_finished() {
                warn!(client_id = %self.client_id, "Client dropped without disconnect, aborting consuming task");
                consumer.abort();
            }
        }
    }
}
