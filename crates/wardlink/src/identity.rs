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

// src/identity.rs
// Logical device identity: which application is talking, and for which
// room and bed. The client id sent to the broker (and stamped into every
// envelope) is "<AppName>_<room>_<bed>".

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    pub app_name: String,
    pub room: String,
    pub bed: String,
}

impl DeviceIdentity {
    pub fn new(
        app_name: impl Into<String>,
        room: impl Into<String>,
        bed: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            room: room.into(),
            bed: bed.into(),
        }
    }

    pub fn client_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.app_name, self.room, self.bed)
    }
}

// ParseIdentityError is returned for client ids that don't have at
// least an app name, a room and a bed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an <AppName>_<room>_<bed> client id")]
pub struct ParseIdentityError(pub String);

impl FromStr for DeviceIdentity {
    type Err = ParseIdentityError;

    // Room and bed are taken from the right, so an app name may itself
    // contain underscores.
    fn from_str(client_id: &str) -> Result<Self, Self::Err> {
        let mut parts = client_id.rsplitn(3, '_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(bed), Some(room), Some(app_name))
                if !bed.is_empty() && !room.is_empty() && !app_name.is_empty() =>
            {
                Ok(Self::new(app_name, room, bed))
            }
            _ => Err(ParseIdentityError(client_id.to_string())),
        }
    }
}
