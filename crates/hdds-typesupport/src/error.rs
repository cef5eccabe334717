// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for type support resolution.

use std::str::Utf8Error;
use thiserror::Error;

/// Failures while resolving rosidl type support into value-type trees.
///
/// Every variant aborts the enclosing resolution: nothing is cached for the
/// failing type or for any type that contains it.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither introspection generator claimed the handle.
    #[error("could not identify typesupport {identifier}")]
    UnrecognizedTypeDescriptor {
        /// `typesupport_identifier` reported by the handle.
        identifier: String,
    },
    /// A null type support handle was passed in.
    #[error("null type support handle")]
    NullTypeSupport,
    /// The generator reported a member table that cannot describe a real struct.
    #[error("malformed layout for {type_name}: {reason}")]
    MalformedLayout {
        /// Fully-qualified message name.
        type_name: String,
        /// What was inconsistent.
        reason: String,
    },
    /// Member declared with a rosidl type id outside the known range.
    #[error("unsupported rosidl type id {type_id} for member {member}")]
    UnsupportedType {
        /// Member name.
        member: String,
        /// Raw `type_id_` value.
        type_id: u8,
    },
    /// The message contains itself through a chain of nested members.
    ///
    /// Raised even when the cycle passes through a sequence. Trees share nested
    /// types through `Arc`, which cannot form a cycle, and the rosidl generators
    /// never emit a self-referencing message.
    #[error("recursive message type {type_name}")]
    RecursiveType {
        /// Fully-qualified message name that re-entered resolution.
        type_name: String,
    },
    /// A namespace, type or member name was not valid UTF-8.
    #[error(transparent)]
    InvalidUtf8(#[from] Utf8Error),
}

impl Error {
    pub(crate) fn malformed(type_name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLayout {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
