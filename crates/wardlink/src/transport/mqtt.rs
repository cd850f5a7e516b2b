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

// src/transport/mqtt.rs
// Transport over a real MQTT broker, backed by rumqttc.
//
// Each connect creates a fresh AsyncClient/EventLoop pair and spawns a
// driver task that polls the event loop. The driver is the only thing
// that sees broker acknowledgements, so it also resolves the waiters for
// connect, subscribe and publish:
//
//   - subscribe/publish push a waiter onto a FIFO and hand the request to
//     rumqttc in the same critical section;
//   - rumqttc reports requests going out (Outgoing::Publish(pkid) etc.) in
//     the order they were queued, so the driver pops the front waiter and
//     files it under its packet id;
//   - SubAck / PubAck / PubComp then complete the waiter for that id.
//
// There is no automatic reconnect. When the event loop errors, the driver
// exits, marks the session disconnected and fails everything pending.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rumqttc::{
    AsyncClient, ClientError, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet,
    QoS, SubscribeReasonCode,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::client::ClientOptions;
use crate::errors::WardlinkClientError;
use crate::message_types::RawMessage;
use crate::transport::Transport;

// DEFAULT_MQTT_PORT is used when the broker address has no port.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

// AckResult is what the driver hands back to a waiter: Ok, or the
// broker's reason for refusing.
type AckResult = Result<(), String>;
type AckSender = oneshot::Sender<AckResult>;

// parse_broker_address splits "host[:port]" (optionally prefixed with
// tcp:// or mqtt://) into host and port.
pub fn parse_broker_address(address: &str) -> Result<(String, u16), WardlinkClientError> {
    let trimmed = address.trim();
    let without_scheme = trimmed
        .strip_prefix("tcp://")
        .or_else(|| trimmed.strip_prefix("mqtt://"))
        .unwrap_or(trimmed);

    let (host, port) = match without_scheme.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| WardlinkClientError::invalid_address(address))?;
            (host, port)
        }
        None => (without_scheme, DEFAULT_MQTT_PORT),
    };

    if host.is_empty() || host.contains('/') {
        return Err(WardlinkClientError::invalid_address(address));
    }
    Ok((host.to_string(), port))
}

// AckTracker pairs outstanding requests with the acknowledgements the
// driver sees.
#[derive(Default)]
struct AckTracker {
    state: Mutex<AckState>,
}

#[derive(Default)]
struct AckState {
    // queued_* are waiters whose request has been handed to rumqttc but
    // not yet assigned a packet id.
    queued_publishes: VecDeque<(QoS, AckSender)>,
    queued_subscribes: VecDeque<AckSender>,
    // *_in_flight are waiters keyed by packet id, waiting on the broker.
    publishes_in_flight: HashMap<u16, AckSender>,
    subscribes_in_flight: HashMap<u16, AckSender>,
}

impl AckTracker {
    fn lock(&self) -> MutexGuard<'_, AckState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // queue_publish registers a waiter and hands the request to rumqttc
    // without an await in between, so a caller giving up (timeout) can
    // never leave the FIFO out of step with what rumqttc has queued.
    fn queue_publish(
        &self,
        qos: QoS,
        request: impl FnOnce() -> Result<(), ClientError>,
    ) -> Result<oneshot::Receiver<AckResult>, WardlinkClientError> {
        let (tx, rx) = oneshot::channel();
        let mut state = self.lock();
        state.queued_publishes.push_back((qos, tx));
        if let Err(e) = request() {
            state.queued_publishes.pop_back();
            return Err(e.into());
        }
        Ok(rx)
    }

    fn queue_subscribe(
        &self,
        request: impl FnOnce() -> Result<(), ClientError>,
    ) -> Result<oneshot::Receiver<AckResult>, WardlinkClientError> {
        let (tx, rx) = oneshot::channel();
        let mut state = self.lock();
        state.queued_subscribes.push_back(tx);
        if let Err(e) = request() {
            state.queued_subscribes.pop_back();
            return Err(e.into());
        }
        Ok(rx)
    }

    // publish_sent is called for Outgoing::Publish. QoS 0 has nothing
    // more to wait for.
    fn publish_sent(&self, pkid: u16) {
        let mut state = self.lock();
        match state.queued_publishes.pop_front() {
            Some((QoS::AtMostOnce, tx)) => {
                let _ = tx.send(Ok(()));
            }
            Some((_, tx)) => file_in_flight(&mut state.publishes_in_flight, pkid, tx),
            None => debug!(pkid, "Outgoing publish with no waiter"),
        }
    }

    fn subscribe_sent(&self, pkid: u16) {
        let mut state = self.lock();
        match state.queued_subscribes.pop_front() {
            Some(tx) => file_in_flight(&mut state.subscribes_in_flight, pkid, tx),
            None => debug!(pkid, "Outgoing subscribe with no waiter"),
        }
    }

    fn publish_acked(&self, pkid: u16) {
        if let Some(tx) = self.lock().publishes_in_flight.remove(&pkid) {
            let _ = tx.send(Ok(()));
        }
    }

    fn subscribe_acked(&self, pkid: u16, result: AckResult) {
        if let Some(tx) = self.lock().subscribes_in_flight.remove(&pkid) {
            let _ = tx.send(result);
        }
    }

    // fail_all drops every waiter; their receivers observe the session
    // closing.
    fn fail_all(&self) {
        let mut state = self.lock();
        state.queued_publishes.clear();
        state.queued_subscribes.clear();
        state.publishes_in_flight.clear();
        state.subscribes_in_flight.clear();
    }
}

// file_in_flight keys a waiter by its packet id. Waiters whose caller has
// already given up (timed out) are dropped here rather than kept until an
// ack that may never come.
fn file_in_flight(in_flight: &mut HashMap<u16, AckSender>, pkid: u16, tx: AckSender) {
    in_flight.retain(|_, waiter| !waiter.is_closed());
    if !tx.is_closed() {
        in_flight.insert(pkid, tx);
    }
}

// SessionShared is what the driver and the transport both hold for one
// broker session.
struct SessionShared {
    // connected flips to true on a successful ConnAck and back to false
    // when the driver exits. Receivers use it to wait for disconnection.
    connected: watch::Sender<bool>,
    acks: AckTracker,
}

impl SessionShared {
    fn new() -> Self {
        let (connected, _) = watch::channel(false);
        Self {
            connected,
            acks: AckTracker::default(),
        }
    }

    fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }
}

struct Session {
    client: AsyncClient,
    driver: JoinHandle<()>,
    shared: Arc<SessionShared>,
}

// MqttTransport is a Transport talking to an MQTT broker.
pub struct MqttTransport {
    options: MqttOptions,
    // request_channel_capacity bounds rumqttc's request queue.
    request_channel_capacity: usize,
    // inbox_capacity bounds deliveries waiting for the consuming task.
    inbox_capacity: usize,
    session: Mutex<Option<Session>>,
    inbox: tokio::sync::Mutex<Option<mpsc::Receiver<RawMessage>>>,
}

impl MqttTransport {
    // new prepares (but does not open) a connection to `address` using
    // `client_id` as the MQTT client identifier.
    pub fn new(
        address: &str,
        client_id: &str,
        options: &ClientOptions,
    ) -> Result<Self, WardlinkClientError> {
        let (host, port) = parse_broker_address(address)?;
        let mut mqtt_options = MqttOptions::new(client_id, host, port);
        mqtt_options
            .set_keep_alive(options.keep_alive())
            .set_clean_session(true);
        if let Some(credentials) = &options.credentials {
            mqtt_options.set_credentials(
                credentials.username.clone(),
                credentials.password.clone(),
            );
        }

        Ok(Self {
            options: mqtt_options,
            request_channel_capacity: options.request_channel_capacity(),
            inbox_capacity: options.inbox_capacity(),
            session: Mutex::new(None),
            inbox: tokio::sync::Mutex::new(None),
        })
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // active_session returns handles for the current session, if it is
    // connected.
    fn active_session(&self) -> Result<(AsyncClient, Arc<SessionShared>), WardlinkClientError> {
        self.lock_session()
            .as_ref()
            .filter(|session| session.shared.is_connected())
            .map(|session| (session.client.clone(), session.shared.clone()))
            .ok_or(WardlinkClientError::NotConnected)
    }
}

#[async_trait]
impl Transport for MqttTransport {
    async fn connect(&self) -> Result<(), WardlinkClientError> {
        let (client, event_loop) =
            AsyncClient::new(self.options.clone(), self.request_channel_capacity);
        let (inbox_tx, inbox_rx) = mpsc::channel(self.inbox_capacity);
        let (connack_tx, connack_rx) = oneshot::channel();
        let shared = Arc::new(SessionShared::new());

        let driver = tokio::spawn(drive_event_loop(
            event_loop,
            shared.clone(),
            inbox_tx,
            connack_tx,
        ));

        let previous = self.lock_session().replace(Session {
            client,
            driver,
            shared,
        });
        if let Some(previous) = previous {
            previous.driver.abort();
        }
        *self.inbox.lock().await = Some(inbox_rx);

        connack_rx
            .await
            .unwrap_or(Err(WardlinkClientError::TransportClosed))
    }

    async fn disconnect(&self) -> Result<(), WardlinkClientError> {
        let handles = self
            .lock_session()
            .as_ref()
            .map(|session| (session.client.clone(), session.shared.clone()));
        let Some((client, shared)) = handles else {
            return Ok(());
        };

        if shared.is_connected() {
            let mut connected = shared.connected.subscribe();
            client.disconnect().await?;
            // The driver flips this once the DISCONNECT packet is out.
            let _ = connected.wait_for(|connected| !*connected).await;
        }

        if let Some(session) = self.lock_session().take() {
            session.driver.abort();
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), WardlinkClientError> {
        let (client, shared) = self.active_session()?;
        let ack = shared
            .acks
            .queue_subscribe(|| client.try_subscribe(topic, qos))?;
        match ack.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(WardlinkClientError::subscribe_rejected(topic, reason)),
            Err(_) => Err(WardlinkClientError::TransportClosed),
        }
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
    ) -> Result<(), WardlinkClientError> {
        let (client, shared) = self.active_session()?;
        let ack = shared
            .acks
            .queue_publish(qos, || client.try_publish(topic, qos, false, payload))?;
        match ack.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(WardlinkClientError::publish_failed(topic, reason)),
            Err(_) => Err(WardlinkClientError::TransportClosed),
        }
    }

    async fn recv(&self) -> Option<RawMessage> {
        let mut inbox = self.inbox.lock().await;
        inbox.as_mut()?.recv().await
    }

    fn is_connected(&self) -> bool {
        self.lock_session()
            .as_ref()
            .is_some_and(|session| session.shared.is_connected())
    }
}

// drive_event_loop polls one session's event loop until it ends, routing
// deliveries to the inbox and acknowledgements to their waiters.
async fn drive_event_loop(
    mut event_loop: EventLoop,
    shared: Arc<SessionShared>,
    inbox: mpsc::Sender<RawMessage>,
    connack: oneshot::Sender<Result<(), WardlinkClientError>>,
) {
    let mut connack = Some(connack);

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    shared.connected.send_replace(true);
                    if let Some(tx) = connack.take() {
                        let _ = tx.send(Ok(()));
                    }
                } else {
                    warn!(code = ?ack.code, "Broker refused connection");
                    if let Some(tx) = connack.take() {
                        let _ = tx.send(Err(WardlinkClientError::ConnectionRejected(format!(
                            "{:?}",
                            ack.code
                        ))));
                    }
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = RawMessage::new(publish.topic, publish.payload.to_vec());
                if let Err(e) = inbox.try_send(message) {
                    warn!(error = %e, "Inbox full, dropping incoming message");
                }
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                let result = if ack
                    .return_codes
                    .iter()
                    .any(|code| matches!(code, SubscribeReasonCode::Failure))
                {
                    Err("broker returned failure reason code".to_string())
                } else {
                    Ok(())
                };
                shared.acks.subscribe_acked(ack.pkid, result);
            }
            Ok(Event::Incoming(Packet::PubAck(ack))) => shared.acks.publish_acked(ack.pkid),
            Ok(Event::Incoming(Packet::PubComp(ack))) => shared.acks.publish_acked(ack.pkid),
            Ok(Event::Incoming(Packet::Disconnect)) => {
                info!("Broker closed the session");
                break;
            }
            Ok(Event::Outgoing(Outgoing::Publish(pkid))) => shared.acks.publish_sent(pkid),
            Ok(Event::Outgoing(Outgoing::Subscribe(pkid))) => shared.acks.subscribe_sent(pkid),
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!("DISCONNECT sent");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                match connack.take() {
                    Some(tx) => {
                        let _ = tx.send(Err(WardlinkClientError::ConnectionRejected(
                            e.to_string(),
                        )));
                    }
                    None => error!(error = %e, "MQTT event loop error, session ended"),
                }
                break;
            }
        }
    }

    shared.connected.send_replace(false);
    shared.acks.fail_all();
}
