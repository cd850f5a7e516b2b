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

// tests/client.rs
// End-to-end tests for MessagingClient over the in-process broker:
// connection lifecycle, subscriptions, publish/read between clients,
// consuming task lifetime, and timeouts.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, sleep};
use tokio_test::{assert_err, assert_ok};
use wardlink::client::timeouts::{PUBLISH_TIMEOUT, SUBSCRIBE_TIMEOUT};
use wardlink::shutdown::SHUTDOWN_TOPIC;
use wardlink::{
    ClientOptions, ConnectionState, Envelope, MemoryBroker, MemoryTransport, MessagingClient,
    QoS, RawMessage, Transport, WardlinkClientError,
};

const LED_TOPIC: &str = "local/signal/led";

fn client_on(broker: &MemoryBroker, client_id: &str) -> MessagingClient {
    MessagingClient::with_transport(broker.transport(), client_id, ClientOptions::default())
}

async fn connected_client(broker: &MemoryBroker, client_id: &str) -> MessagingClient {
    let client = client_on(broker, client_id);
    client.connect().await.unwrap();
    client
}

// wait_until polls `condition` for up to a second.
async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    condition()
}

async fn wait_until_not_consuming(client: &MessagingClient) -> bool {
    for _ in 0..100 {
        if !client.is_consuming().await {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    false
}

// raw_publisher is a bare transport for sending bytes that didn't come
// from an envelope.
async fn raw_publisher(broker: &MemoryBroker) -> MemoryTransport {
    let transport = broker.transport();
    transport.connect().await.unwrap();
    transport
}

#[tokio::test]
async fn test_connect_and_disconnect() {
    let broker = MemoryBroker::new();
    let client = client_on(&broker, "A_1_1");
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert!(!client.is_connected());

    assert_ok!(client.connect().await);
    assert!(client.is_connected());
    assert_eq!(client.connection_state(), ConnectionState::Connected);
    assert_eq!(broker.subscriber_count(SHUTDOWN_TOPIC), 1);
    assert!(client.is_consuming().await);
    assert_eq!(client.consumer_spawn_count(), 1);

    assert_ok!(client.disconnect().await);
    assert!(!client.is_connected());
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert!(!client.is_consuming().await);
    assert_eq!(broker.session_count(), 0);
    assert_eq!(broker.published_on(SHUTDOWN_TOPIC), vec![b"A_1_1".to_vec()]);
}

#[tokio::test]
async fn test_connect_when_connected_is_noop() {
    let broker = MemoryBroker::new();
    let client = connected_client(&broker, "A_1_1").await;

    client.connect().await.unwrap();
    assert_eq!(broker.session_count(), 1);
    assert_eq!(client.consumer_spawn_count(), 1);

    client.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_connect_to_offline_broker() {
    let broker = MemoryBroker::new();
    broker.set_offline(true);
    let client = client_on(&broker, "A_1_1");

    let err = assert_err!(client.connect().await);
    assert!(matches!(err, WardlinkClientError::ConnectionRejected(_)));
    assert!(err.is_connection_error());
    assert!(!client.is_connected());
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert_eq!(client.consumer_spawn_count(), 0);

    // Nothing to tear down, still fine.
    client.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_operations_before_connect() {
    let broker = MemoryBroker::new();
    let client = client_on(&broker, "A_1_1");

    let err = client.subscribe(LED_TOPIC).await.unwrap_err();
    assert!(matches!(err, WardlinkClientError::NotConnected));

    let err = client
        .publish(true, "A_1_1", "1", "1", LED_TOPIC)
        .await
        .unwrap_err();
    assert!(matches!(err, WardlinkClientError::NotConnected));
    assert_eq!(client.publish_stats().total_failed, 1);
    assert!(broker.published().is_empty());

    assert!(client.get_bool(LED_TOPIC).is_none());
    assert!(client.subscribed_topics().is_empty());
    assert_eq!(client.consumer_spawn_count(), 0);
}

#[tokio::test]
async fn test_publish_and_read_between_clients() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;
    let b = connected_client(&broker, "B_2_7").await;

    a.subscribe(LED_TOPIC).await.unwrap();
    b.publish(true, "B_2_7", "2", "7", LED_TOPIC).await.unwrap();

    assert!(wait_until(|| a.has_pending(LED_TOPIC)).await);
    let reading = a.get_bool(LED_TOPIC).unwrap();
    assert!(reading.value);
    assert_eq!(reading.room, "2");
    assert_eq!(reading.bed, "7");
    assert_eq!(reading.client_id, "B_2_7");
    assert!(reading.timestamp_utc().is_some());

    // Read once, gone.
    assert!(a.get_bool(LED_TOPIC).is_none());
    assert_eq!(b.publish_stats().total_published, 1);
    assert_eq!(a.routing_stats().total_read, 1);

    a.disconnect().await.unwrap();
    b.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_publish_string_and_wrong_kind_read() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;
    a.subscribe("local/update/led").await.unwrap();

    a.publish("status", "A_1_1", "1", "1", "local/update/led")
        .await
        .unwrap();
    a.publish("again", "A_1_1", "1", "1", "local/update/led")
        .await
        .unwrap();
    assert!(wait_until(|| a.pending("local/update/led") == 2).await);

    // The first one is consumed by the mismatched read.
    assert!(a.get_bool("local/update/led").is_none());
    let reading = a.get_string("local/update/led").unwrap();
    assert_eq!(reading.value, "again");
    assert_eq!(a.routing_stats().total_undecodable, 1);

    a.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_subscribe_twice_keeps_buffer_and_consumer() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;

    a.subscribe(LED_TOPIC).await.unwrap();
    a.publish(false, "A_1_1", "1", "1", LED_TOPIC).await.unwrap();
    assert!(wait_until(|| a.pending(LED_TOPIC) == 1).await);

    a.subscribe(LED_TOPIC).await.unwrap();
    assert_eq!(a.pending(LED_TOPIC), 1);
    assert_eq!(a.subscribed_topics(), vec![LED_TOPIC.to_string()]);
    assert_eq!(a.consumer_spawn_count(), 1);

    a.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_subscribe_all() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;

    a.subscribe_all(["b/topic", "a/topic"]).await.unwrap();
    a.subscribe_all("c/topic").await.unwrap();
    assert_eq!(
        a.subscribed_topics(),
        vec!["a/topic".to_string(), "b/topic".to_string(), "c/topic".to_string()]
    );
    assert_eq!(broker.subscriber_count("a/topic"), 1);

    a.disconnect().await.unwrap();
}

// RejectingTransport refuses subscriptions to one topic and otherwise
// behaves like the memory transport it wraps.
struct RejectingTransport {
    inner: MemoryTransport,
    reject: &'static str,
}

#[async_trait]
impl Transport for RejectingTransport {
    async fn connect(&self) -> Result<(), WardlinkClientError> {
        self.inner.connect().await
    }

    async fn disconnect(&self) -> Result<(), WardlinkClientError> {
        self.inner.disconnect().await
    }

    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), WardlinkClientError> {
        if topic == self.reject {
            return Err(WardlinkClientError::subscribe_rejected(topic, "Failure"));
        }
        self.inner.subscribe(topic, qos).await
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
    ) -> Result<(), WardlinkClientError> {
        self.inner.publish(topic, payload, qos).await
    }

    async fn recv(&self) -> Option<RawMessage> {
        self.inner.recv().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}

#[tokio::test]
async fn test_subscribe_all_stops_at_first_failure() {
    let broker = MemoryBroker::new();
    let transport = RejectingTransport {
        inner: broker.transport(),
        reject: "second",
    };
    let client = MessagingClient::with_transport(transport, "A_1_1", ClientOptions::default());
    client.connect().await.unwrap();

    let err = client
        .subscribe_all(vec!["first", "second", "third"])
        .await
        .unwrap_err();
    assert!(err.is_subscription_error());

    // What succeeded before the failure stays; nothing after it is tried.
    assert_eq!(client.subscribed_topics(), vec!["first".to_string()]);
    assert_eq!(broker.subscriber_count("third"), 0);

    client.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_overflow_keeps_latest() {
    let broker = MemoryBroker::new();
    let a = MessagingClient::with_transport(
        broker.transport(),
        "A_1_1",
        ClientOptions::default().with_buffer_capacity(3),
    );
    a.connect().await.unwrap();
    a.subscribe(LED_TOPIC).await.unwrap();

    for i in 0..5 {
        a.publish(i.to_string(), "A_1_1", "1", "1", LED_TOPIC)
            .await
            .unwrap();
    }
    assert!(wait_until(|| a.routing_stats().total_routed == 5).await);
    assert_eq!(a.routing_stats().total_overwritten, 2);

    let values: Vec<String> = std::iter::from_fn(|| a.get_string(LED_TOPIC))
        .map(|reading| reading.value)
        .collect();
    assert_eq!(values, vec!["2", "3", "4"]);

    a.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_read_unknown_topic_creates_nothing() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;

    assert!(a.get_bool("never/subscribed").is_none());
    assert!(a.get_string("never/subscribed").is_none());
    assert_eq!(a.pending("never/subscribed"), 0);
    assert!(a.subscribed_topics().is_empty());

    a.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_init_sentinel_is_ignored() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;
    a.subscribe(LED_TOPIC).await.unwrap();

    let raw = raw_publisher(&broker).await;
    raw.publish(LED_TOPIC, b"INIT".to_vec(), QoS::AtMostOnce)
        .await
        .unwrap();
    let envelope = Envelope::now(true, "Raw_0_0", "0", "0");
    raw.publish(LED_TOPIC, envelope.encode().unwrap(), QoS::AtMostOnce)
        .await
        .unwrap();

    assert!(wait_until(|| a.routing_stats().total_routed == 1).await);
    assert_eq!(a.routing_stats().total_sentinels_ignored, 1);
    assert_eq!(a.pending(LED_TOPIC), 1);
    assert_eq!(a.get_bool(LED_TOPIC).unwrap().client_id, "Raw_0_0");

    a.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_undecodable_message_is_consumed() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;
    a.subscribe(LED_TOPIC).await.unwrap();

    let raw = raw_publisher(&broker).await;
    raw.publish(LED_TOPIC, b"{\"data\":true}".to_vec(), QoS::AtMostOnce)
        .await
        .unwrap();
    assert!(wait_until(|| a.pending(LED_TOPIC) == 1).await);

    assert!(a.get_bool(LED_TOPIC).is_none());
    assert_eq!(a.pending(LED_TOPIC), 0);
    assert_eq!(a.routing_stats().total_undecodable, 1);

    a.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_other_clients_stop_signal_is_not_ours() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;
    let b = connected_client(&broker, "B_1_2").await;

    b.disconnect().await.unwrap();

    assert!(wait_until(|| a.routing_stats().total_unknown_topic == 1).await);
    assert!(a.is_consuming().await);
    assert!(a.is_connected());

    a.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_disconnect_is_prompt() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;
    a.subscribe(LED_TOPIC).await.unwrap();

    // Let the consuming task settle into its poll.
    sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    a.disconnect().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(!a.is_connected());
    assert!(!a.is_consuming().await);
}

#[tokio::test]
async fn test_repeated_disconnect() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;

    a.disconnect().await.unwrap();
    a.disconnect().await.unwrap();
    assert!(!a.is_connected());
    assert_eq!(broker.published_on(SHUTDOWN_TOPIC).len(), 1);

    let never_connected = client_on(&broker, "C_1_3");
    never_connected.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_after_session_loss() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;
    let b = connected_client(&broker, "B_2_7").await;
    a.subscribe(LED_TOPIC).await.unwrap();

    broker.drop_all_sessions();
    assert!(wait_until(|| !a.is_connected()).await);
    assert!(wait_until_not_consuming(&a).await);
    assert_eq!(a.connection_state(), ConnectionState::Disconnected);

    a.connect().await.unwrap();
    b.connect().await.unwrap();
    assert_eq!(a.consumer_spawn_count(), 2);

    // The broker forgot the subscription; the local buffer survived.
    assert_eq!(a.subscribed_topics(), vec![LED_TOPIC.to_string()]);
    a.subscribe(LED_TOPIC).await.unwrap();
    b.publish(true, "B_2_7", "2", "7", LED_TOPIC).await.unwrap();
    assert!(wait_until(|| a.has_pending(LED_TOPIC)).await);
    assert!(a.get_bool(LED_TOPIC).unwrap().value);

    a.disconnect().await.unwrap();
    b.disconnect().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_publishes_are_whole_envelopes() {
    let broker = MemoryBroker::new();
    let client = Arc::new(connected_client(&broker, "A_1_1").await);

    let tasks: Vec<_> = (0..8)
        .map(|task| {
            let client = client.clone();
            tokio::spawn(async move {
                for i in 0..25 {
                    let value = format!("{task}-{i}");
                    client
                        .publish(value, "A_1_1", "1", "1", "local/burst")
                        .await
                        .unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let published = broker.published_on("local/burst");
    assert_eq!(published.len(), 200);
    for payload in &published {
        let reading = Envelope::decode(payload)
            .unwrap()
            .into_reading::<String>()
            .unwrap();
        assert_eq!(reading.client_id, "A_1_1");
    }
    assert_eq!(client.publish_stats().total_published, 200);

    client.disconnect().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_subscribe_timeout() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;

    broker.set_unresponsive(true);
    let started = Instant::now();
    let err = a.subscribe(LED_TOPIC).await.unwrap_err();
    assert!(matches!(err, WardlinkClientError::SubscribeTimeout { .. }));
    assert!(err.is_timeout());
    assert!(started.elapsed() >= SUBSCRIBE_TIMEOUT);

    // A failed subscription leaves no buffer behind.
    assert!(a.subscribed_topics().is_empty());

    broker.set_unresponsive(false);
    a.disconnect().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_publish_timeout() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;

    broker.set_unresponsive(true);
    let started = Instant::now();
    let err = a
        .publish(true, "A_1_1", "1", "1", LED_TOPIC)
        .await
        .unwrap_err();
    assert!(matches!(err, WardlinkClientError::PublishTimeout { .. }));
    assert!(err.is_publish_error());
    assert!(started.elapsed() >= PUBLISH_TIMEOUT);

    let stats = a.publish_stats();
    assert_eq!(stats.total_timed_out, 1);
    assert_eq!(stats.total_failed, 1);
    assert_eq!(stats.total_published, 0);

    broker.set_unresponsive(false);
    a.disconnect().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_with_unresponsive_broker_still_stops_consumer() {
    let broker = MemoryBroker::new();
    let a = connected_client(&broker, "A_1_1").await;

    // The stop signal can't get through; the consuming task is aborted
    // after its grace period instead.
    broker.set_unresponsive(true);
    a.disconnect().await.unwrap();
    assert!(!a.is_connected());
    assert!(!a.is_consuming().await);
}

// LingeringTransport models a session whose inbox doesn't close when
// the broker goes away. Once armed, it holds the consuming task inside
// is_connected right after the task saw the session gone, so the task
// is on its way out but hasn't returned yet.
struct LingeringTransport {
    inner: MemoryTransport,
    armed: Arc<AtomicBool>,
    held: Arc<AtomicBool>,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

fn open_gate(gate: &(Mutex<bool>, Condvar)) {
    let (open, cvar) = gate;
    *open.lock().unwrap() = true;
    cvar.notify_all();
}

#[async_trait]
impl Transport for LingeringTransport {
    async fn connect(&self) -> Result<(), WardlinkClientError> {
        self.inner.connect().await
    }

    async fn disconnect(&self) -> Result<(), WardlinkClientError> {
        self.inner.disconnect().await
    }

    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), WardlinkClientError> {
        self.inner.subscribe(topic, qos).await
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
    ) -> Result<(), WardlinkClientError> {
        self.inner.publish(topic, payload, qos).await
    }

    async fn recv(&self) -> Option<RawMessage> {
        match self.inner.recv().await {
            Some(message) => Some(message),
            None => std::future::pending().await,
        }
    }

    fn is_connected(&self) -> bool {
        let connected = self.inner.is_connected();
        if !connected && self.armed.swap(false, Ordering::SeqCst) {
            self.held.store(true, Ordering::SeqCst);
            let (open, cvar) = &*self.gate;
            let mut open = open.lock().unwrap();
            while !*open {
                open = cvar.wait(open).unwrap();
            }
        }
        connected
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reconnect_while_old_consumer_is_exiting() {
    let broker = MemoryBroker::new();
    let armed = Arc::new(AtomicBool::new(false));
    let held = Arc::new(AtomicBool::new(false));
    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let transport = LingeringTransport {
        inner: broker.transport(),
        armed: armed.clone(),
        held: held.clone(),
        gate: gate.clone(),
    };
    let client = MessagingClient::with_transport(transport, "A_1_1", ClientOptions::default());
    client.connect().await.unwrap();
    client.subscribe(LED_TOPIC).await.unwrap();

    // Lose the session. The consuming task notices after its next poll
    // times out and is held on the way out.
    armed.store(true, Ordering::SeqCst);
    broker.drop_all_sessions();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !held.load(Ordering::SeqCst) {
        assert!(Instant::now() < deadline, "consuming task never saw the session end");
        sleep(Duration::from_millis(10)).await;
    }

    // Reconnect while the old task is held, letting it go shortly after.
    let release = {
        let gate = gate.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            open_gate(&gate);
        })
    };
    assert_ok!(client.connect().await);
    release.await.unwrap();

    assert!(client.is_connected());
    assert!(client.is_consuming().await);
    assert_eq!(client.consumer_spawn_count(), 2);

    // The new task delivers.
    client.subscribe(LED_TOPIC).await.unwrap();
    let other = connected_client(&broker, "B_2_7").await;
    other.publish(true, "B_2_7", "2", "7", LED_TOPIC).await.unwrap();
    assert!(wait_until(|| client.has_pending(LED_TOPIC)).await);

    client.disconnect().await.unwrap();
    other.disconnect().await.unwrap();
}

// OverlapTransport counts publishes that were in flight at the same
// time. Each publish yields partway through so that unserialized callers
// would interleave.
struct OverlapTransport {
    inner: MemoryTransport,
    active: Arc<AtomicUsize>,
    overlaps: Arc<AtomicUsize>,
}

#[async_trait]
impl Transport for OverlapTransport {
    async fn connect(&self) -> Result<(), WardlinkClientError> {
        self.inner.connect().await
    }

    async fn disconnect(&self) -> Result<(), WardlinkClientError> {
        self.inner.disconnect().await
    }

    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), WardlinkClientError> {
        self.inner.subscribe(topic, qos).await
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
    ) -> Result<(), WardlinkClientError> {
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        sleep(Duration::from_millis(1)).await;
        let result = self.inner.publish(topic, payload, qos).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn recv(&self) -> Option<RawMessage> {
        self.inner.recv().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_publishes_are_serialized() {
    let broker = MemoryBroker::new();
    let active = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let transport = OverlapTransport {
        inner: broker.transport(),
        active: active.clone(),
        overlaps: overlaps.clone(),
    };
    let client = Arc::new(MessagingClient::with_transport(
        transport,
        "A_1_1",
        ClientOptions::default(),
    ));
    client.connect().await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|task| {
            let client = client.clone();
            tokio::spawn(async move {
                for i in 0..10 {
                    let value = format!("{task}-{i}");
                    client
                        .publish(value, "A_1_1", "1", "1", "local/burst")
                        .await
                        .unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(active.load(Ordering::SeqCst), 0);
    assert_eq!(broker.published_on("local/burst").len(), 80);

    client.disconnect().await.unwrap();
}
