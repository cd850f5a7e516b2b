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

// src/client/topics.rs
// Flexible topic list input for subscribe_all.
//
// Lets callers hand over one topic or many, as literals, owned strings,
// arrays, vecs or slices, without converting first.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topics {
    Single(String),
    Multiple(Vec<String>),
}

impl Topics {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(topic) => vec![topic],
            Self::Multiple(topics) => topics,
        }
    }
}

impl From<&str> for Topics {
    fn from(topic: &str) -> Self {
        Self::Single(topic.to_string())
    }
}

impl From<String> for Topics {
    fn from(topic: String) -> Self {
        Self::Single(topic)
    }
}

impl From<Vec<&str>> for Topics {
    fn from(topics: Vec<&str>) -> Self {
        Self::Multiple(topics.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for Topics {
    fn from(topics: Vec<String>) -> Self {
        Self::Multiple(topics)
    }
}

impl<const N: usize> From<[&str; N]> for Topics {
    fn from(topics: [&str; N]) -> Self {
        Self::Multiple(topics.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Topics {
    fn from(topics: &[&str]) -> Self {
        Self::Multiple(topics.iter().map(|topic| topic.to_string()).collect())
    }
}

impl From<&[String]> for Topics {
    fn from(topics: &[String]) -> Self {
        Self::Multiple(topics.to_vec())
    }
}

impl std::fmt::Display for Topics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(topic) => write!(f, "'{topic}'"),
            Self::Multiple(topics) => write!(
                f,
                "[{}]",
                topics
                    .iter()
                    .map(|topic| format!("'{topic}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}
