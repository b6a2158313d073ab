// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors produced by the runtime boundary.

use std::fmt;

/// A failure to decode file bytes into a live file object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte stream is not a valid animation file.
    Malformed(String),
    /// The file's format version is newer than this runtime understands.
    UnsupportedVersion {
        /// Version found in the header.
        found: u32,
        /// Newest version the runtime supports.
        supported: u32,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(msg) => write!(f, "Malformed animation file: {msg}"),
            DecodeError::UnsupportedVersion { found, supported } => {
                write!(
                    f,
                    "Unsupported file version {found} (newest supported is {supported})"
                )
            }
        }
    }
}

impl std::error::Error for DecodeError {}
