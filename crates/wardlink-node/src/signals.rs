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

// src/signals.rs
// Turns SIGINT/SIGTERM into cancellation of a CancellationToken.

use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

// spawn_signal_listener cancels `cancel` on the first SIGINT or SIGTERM.
// The listener also ends (without doing anything) if the token is
// cancelled some other way.
pub fn spawn_signal_listener(cancel: CancellationToken) -> eyre::Result<JoinHandle<()>> {
    let mut term_signal = signal(SignalKind::terminate())?;
    let mut int_signal = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = term_signal.recv() => info!("TERM signal received, shutting down"),
            _ = int_signal.recv() => info!("INT signal received, shutting down"),
            _ = cancel.cancelled() => return,
        }
        cancel.cancel();
    }))
}
