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

// src/bin/wardlink-dashboard.rs

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wardlink_node::logging::setup_logging;
use wardlink_node::signals::spawn_signal_listener;
use wardlink_node::{DashboardOptions, dashboard};

fn main() -> eyre::Result<()> {
    let options = DashboardOptions::load();
    setup_logging(options.debug)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(async {
        let cancel = CancellationToken::new();
        let _listener = spawn_signal_listener(cancel.clone())?;
        dashboard::start(options, cancel).await
    });
    // stdin reads run on a blocking thread that won't notice shutdown.
    rt.shutdown_timeout(Duration::from_secs(2));
    result?;
    Ok(())
}
