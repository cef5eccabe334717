// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Environment variable configuration for the type registry.
//!
//! - `HDDS_TYPESUPPORT_VALIDATE_LAYOUT`: check member offsets against the struct
//!   size while walking ("0" or "false" disables, default: enabled)
//! - `HDDS_TYPESUPPORT_CAPACITY_HINT`: initial registry capacity (default: 64)
//!
//! # Example
//!
//! ```bash
//! export HDDS_TYPESUPPORT_VALIDATE_LAYOUT=false
//! export HDDS_TYPESUPPORT_CAPACITY_HINT=256
//! ```

use std::env;

pub const ENV_VALIDATE_LAYOUT: &str = "HDDS_TYPESUPPORT_VALIDATE_LAYOUT";
pub const ENV_CAPACITY_HINT: &str = "HDDS_TYPESUPPORT_CAPACITY_HINT";

const DEFAULT_CAPACITY_HINT: usize = 64;

/// Runtime configuration for a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Reject member tables whose offsets decrease or exceed the struct size.
    pub validate_layout: bool,

    /// Number of message types to reserve room for up front.
    pub capacity_hint: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            validate_layout: true,
            capacity_hint: DEFAULT_CAPACITY_HINT,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let validate_layout = env::var(ENV_VALIDATE_LAYOUT)
            .ok()
            .map(|s| !(s == "0" || s.eq_ignore_ascii_case("false")))
            .unwrap_or(true);

        let capacity_hint = env::var(ENV_CAPACITY_HINT)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CAPACITY_HINT);

        Self {
            validate_layout,
            capacity_hint,
        }
    }

    /// Check if any setting differs from the defaults
    #[must_use]
    pub fn is_custom(&self) -> bool {
        *self != Self::default()
    }
}
