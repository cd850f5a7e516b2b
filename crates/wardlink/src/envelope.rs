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

// src/envelope.rs
// The uniform JSON envelope every application message travels in.
//
// An envelope is a flat object with exactly five keys:
//
//   { "data": true, "room": "3", "bed": "2",
//     "timestamp": "2025-03-01T08:15:30.123456Z", "clientId": "FastLEDControl_3_2" }
//
// `data` is either a boolean or a string. Decoding is strict: a missing
// key, a wrongly typed value, or malformed text is a decode error, which
// the client turns into "nothing found" rather than surfacing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::WardlinkClientError;

// TIMESTAMP_FORMAT renders UTC with microseconds and a trailing Z.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

// Payload is the value carried in the `data` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Bool(bool),
    Text(String),
}

impl Payload {
    // kind is the name used in logs and WrongDataKind errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => bool::KIND,
            Self::Text(_) => String::KIND,
        }
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// EnvelopeValue is implemented by the Rust types an envelope's `data`
// can be read back as. It lets the client expose one generic accessor
// instead of duplicating the decode path per kind.
pub trait EnvelopeValue: Sized {
    // KIND names the JSON kind this type expects.
    const KIND: &'static str;

    // from_payload returns None when the payload is the other kind.
    fn from_payload(payload: Payload) -> Option<Self>;

    fn into_payload(self) -> Payload;
}

impl EnvelopeValue for bool {
    const KIND: &'static str = "bool";

    fn from_payload(payload: Payload) -> Option<Self> {
        match payload {
            Payload::Bool(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Bool(self)
    }
}

impl EnvelopeValue for String {
    const KIND: &'static str = "string";

    fn from_payload(payload: Payload) -> Option<Self> {
        match payload {
            Payload::Text(value) => Some(value),
            Payload::Bool(_) => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Text(self)
    }
}

// Envelope is the wire form of one application message. Field order
// here is the order keys are written on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Payload,
    pub room: String,
    pub bed: String,
    // timestamp is kept as the sender wrote it so a read hands back
    // exactly what was published.
    pub timestamp: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
}

impl Envelope {
    // now builds an envelope stamped with the current UTC time.
    pub fn now(
        data: impl Into<Payload>,
        client_id: impl Into<String>,
        room: impl Into<String>,
        bed: impl Into<String>,
    ) -> Self {
        Self::at(data, client_id, room, bed, Utc::now())
    }

    // at builds an envelope stamped with an explicit time.
    pub fn at(
        data: impl Into<Payload>,
        client_id: impl Into<String>,
        room: impl Into<String>,
        bed: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            data: data.into(),
            room: room.into(),
            bed: bed.into(),
            timestamp: format_timestamp(timestamp),
            client_id: client_id.into(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, WardlinkClientError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WardlinkClientError> {
        serde_json::from_slice(bytes).map_err(WardlinkClientError::EnvelopeDecodeError)
    }

    // into_reading converts the envelope into a typed Reading, failing
    // if `data` is not of kind T.
    pub fn into_reading<T: EnvelopeValue>(self) -> Result<Reading<T>, WardlinkClientError> {
        let found = self.data.kind();
        let value = T::from_payload(self.data)
            .ok_or_else(|| WardlinkClientError::wrong_data_kind(T::KIND, found))?;
        Ok(Reading {
            room: self.room,
            bed: self.bed,
            value,
            client_id: self.client_id,
            timestamp: self.timestamp,
        })
    }
}

// Reading is what a successful get hands back: the decoded envelope with
// `data` already narrowed to the requested type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reading<T> {
    pub room: String,
    pub bed: String,
    pub value: T,
    pub client_id: String,
    pub timestamp: String,
}

impl<T> Reading<T> {
    // timestamp_utc parses the sender's timestamp. None if the sender
    // wrote something that isn't RFC 3339.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

// format_timestamp renders a UTC time the way envelopes carry it.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
