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

// src/frames.rs
// Camera frames for the LED node.
//
// Frames arrive as a plain stream of raw 8-bit grayscale images of a
// fixed size, back to back (e.g. from `ffmpeg -f rawvideo -pix_fmt gray`
// or a capture daemon writing to a FIFO).

use std::path::Path;

use async_trait::async_trait;
use eyre::WrapErr;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::brightness;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn mean_brightness(&self) -> Option<f64> {
        brightness::mean_brightness(&self.pixels)
    }

    pub fn led_signal(&self, threshold: f64) -> bool {
        brightness::led_signal(&self.pixels, threshold)
    }
}

// FrameSource yields frames until the stream ends. next_frame may wait
// indefinitely for the next one; callers bound the wait.
#[async_trait]
pub trait FrameSource: Send {
    // next_frame returns None once the stream has ended cleanly.
    async fn next_frame(&mut self) -> eyre::Result<Option<Frame>>;
}

// RawFrameReader cuts a byte stream into width * height frames.
pub struct RawFrameReader<R> {
    reader: R,
    width: usize,
    height: usize,
    frame_len: usize,
}

impl<R> RawFrameReader<R> {
    pub fn new(reader: R, width: usize, height: usize) -> eyre::Result<Self> {
        let frame_len = frame_len(width, height)?;
        Ok(Self {
            reader,
            width,
            height,
            frame_len,
        })
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }
}

// frame_len is the byte size of one width x height frame. Empty sizes
// and sizes that don't fit in memory are rejected.
fn frame_len(width: usize, height: usize) -> eyre::Result<usize> {
    match width.checked_mul(height) {
        Some(0) => Err(eyre::eyre!("frame size {width}x{height} is empty")),
        Some(len) if isize::try_from(len).is_ok() => Ok(len),
        _ => Err(eyre::eyre!("frame size {width}x{height} is too large")),
    }
}

pub type BoxedFrameReader = RawFrameReader<Box<dyn AsyncRead + Unpin + Send>>;

// open_frame_stream opens `path` for reading frames, with "-" meaning
// stdin.
pub async fn open_frame_stream(
    path: &Path,
    width: usize,
    height: usize,
) -> eyre::Result<BoxedFrameReader> {
    frame_len(width, height)?;
    let reader: Box<dyn AsyncRead + Unpin + Send> = if path == Path::new("-") {
        Box::new(tokio::io::stdin())
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .wrap_err_with(|| format!("Error opening input stream {}", path.display()))?;
        Box::new(file)
    };
    RawFrameReader::new(reader, width, height)
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> FrameSource for RawFrameReader<R> {
    async fn next_frame(&mut self) -> eyre::Result<Option<Frame>> {
        let mut pixels = vec![0u8; self.frame_len()];
        let mut filled = 0;
        while filled < pixels.len() {
            let read = self
                .reader
                .read(&mut pixels[filled..])
                .await
                .wrap_err("Error reading frame")?;
            if read == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(eyre::eyre!(
                    "input stream ended mid-frame ({filled} of {} bytes)",
                    pixels.len()
                ));
            }
            filled += read;
        }
        Ok(Some(Frame {
            width: self.width,
            height: self.height,
            pixels,
        }))
    }
}
