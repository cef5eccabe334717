// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-typesupport
//!
//! Bridge between ROS 2 `rosidl` introspection type support and the generic
//! CDR serializer used by `rmw_hdds`.
//!
//! A message type arrives as an opaque `rosidl_message_type_support_t` handle
//! produced by one of two code generators (`rosidl_typesupport_introspection_c`
//! or `rosidl_typesupport_introspection_cpp`). The [`TypeRegistry`] detects the
//! generator, walks the member table once and returns a shared
//! [`StructValueType`] tree describing every member by byte offset, extent and
//! [`ValueType`]. A serializer can then read or write any message instance from
//! that tree alone.
//!
//! ```text
//! rosidl handle --probe--> TypeGenerator --read--> MessageLayout
//!                                                      |
//!                                                   layout::walk  (nested members recurse)
//!                                                      |
//!                                 TypeRegistry <--- StructValueType (Arc, built once per key)
//! ```
//!
//! Services are split into request/response message handles with
//! [`split_service`] and then resolved like any other message.

pub mod config;
mod error;
pub mod ffi;
pub mod generator;
pub mod introspection;
mod layout;
pub mod registry;
pub mod service;
pub mod value_type;

pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use generator::TypeGenerator;
pub use registry::{LookupStats, TypeRegistry};
pub use service::split_service;
pub use value_type::{
    Member, PrimitiveKind, SequenceStorage, StringRepr, StructValueType, TypeKey, ValueType,
};
