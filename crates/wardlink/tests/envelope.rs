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

// tests/envelope.rs
// Tests for the JSON envelope: wire shape, strict decoding, and typed
// reads of the `data` field.

use chrono::{TimeZone, Utc};
use serde_json::Value;
use wardlink::envelope::{Envelope, Payload, format_timestamp};
use wardlink::errors::WardlinkClientError;

fn fixed_envelope(data: impl Into<Payload>) -> Envelope {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 15, 30).unwrap();
    Envelope::at(data, "FastLEDControl_3_2", "3", "2", at)
}

#[test]
fn test_wire_keys() {
    let bytes = fixed_envelope(true).encode().unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["bed", "clientId", "data", "room", "timestamp"]);

    assert_eq!(object["data"], Value::Bool(true));
    assert_eq!(object["room"], "3");
    assert_eq!(object["bed"], "2");
    assert_eq!(object["clientId"], "FastLEDControl_3_2");
    assert_eq!(object["timestamp"], "2025-03-01T08:15:30.000000Z");
}

#[test]
fn test_string_data_on_the_wire() {
    let bytes = fixed_envelope("hello").encode().unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["data"], "hello");
}

#[test]
fn test_bool_reading() {
    let bytes = fixed_envelope(false).encode().unwrap();
    let reading = Envelope::decode(&bytes)
        .unwrap()
        .into_reading::<bool>()
        .unwrap();

    assert!(!reading.value);
    assert_eq!(reading.room, "3");
    assert_eq!(reading.bed, "2");
    assert_eq!(reading.client_id, "FastLEDControl_3_2");
    assert_eq!(reading.timestamp, "2025-03-01T08:15:30.000000Z");
    assert_eq!(
        reading.timestamp_utc(),
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 15, 30).unwrap())
    );
}

#[test]
fn test_decode_from_foreign_sender() {
    // Key order and timestamp precision are whatever the sender chose.
    let raw = br#"{"clientId":"Dashboard_1_1","timestamp":"2025-01-02T03:04:05Z","bed":"1","room":"1","data":"status"}"#;
    let reading = Envelope::decode(raw)
        .unwrap()
        .into_reading::<String>()
        .unwrap();

    assert_eq!(reading.value, "status");
    assert_eq!(reading.client_id, "Dashboard_1_1");
    assert_eq!(reading.timestamp, "2025-01-02T03:04:05Z");
}

#[test]
fn test_missing_key_is_decode_error() {
    let raw = br#"{"data":true,"room":"3","timestamp":"2025-01-02T03:04:05Z","clientId":"x"}"#;
    let err = Envelope::decode(raw).unwrap_err();
    assert!(matches!(err, WardlinkClientError::EnvelopeDecodeError(_)));
    assert!(err.is_decode_error());
}

#[test]
fn test_wrong_field_type_is_decode_error() {
    let raw = br#"{"data":true,"room":3,"bed":"2","timestamp":"t","clientId":"x"}"#;
    assert!(Envelope::decode(raw).is_err());

    let raw = br#"{"data":7,"room":"3","bed":"2","timestamp":"t","clientId":"x"}"#;
    assert!(Envelope::decode(raw).is_err());
}

#[test]
fn test_malformed_json_is_decode_error() {
    assert!(Envelope::decode(b"INIT").is_err());
    assert!(Envelope::decode(b"").is_err());
    assert!(Envelope::decode(b"{\"data\":").is_err());
}

#[test]
fn test_wrong_kind() {
    let envelope = fixed_envelope("on");
    let err = envelope.into_reading::<bool>().unwrap_err();
    match err {
        WardlinkClientError::WrongDataKind { expected, found } => {
            assert_eq!(expected, "bool");
            assert_eq!(found, "string");
        }
        other => panic!("expected WrongDataKind, got {other:?}"),
    }

    let err = fixed_envelope(true).into_reading::<String>().unwrap_err();
    assert!(err.is_decode_error());
}

#[test]
fn test_payload_kind_and_conversions() {
    assert_eq!(Payload::from(true), Payload::Bool(true));
    assert_eq!(Payload::from("x"), Payload::Text("x".to_string()));
    assert_eq!(Payload::from(String::from("y")).kind(), "string");
    assert_eq!(Payload::Bool(false).kind(), "bool");
}

#[test]
fn test_timestamp_format() {
    let at = Utc
        .with_ymd_and_hms(2024, 12, 31, 23, 59, 59)
        .unwrap()
        .checked_add_signed(chrono::Duration::microseconds(123_456))
        .unwrap();
    assert_eq!(format_timestamp(at), "2024-12-31T23:59:59.123456Z");
}

#[test]
fn test_now_is_parseable() {
    let envelope = Envelope::now(true, "a_1_1", "1", "1");
    let reading = envelope.into_reading::<bool>().unwrap();
    let parsed = reading.timestamp_utc().unwrap();
    assert!((Utc::now() - parsed).num_seconds().abs() < 5);
}
