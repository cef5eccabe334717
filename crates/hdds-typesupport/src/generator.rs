// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Introspection code generators that can describe a message layout.

use crate::value_type::{SequenceStorage, StringRepr};
use std::ffi::CStr;
use std::fmt;

/// ROS 2 introspection backend that produced a type support handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TypeGenerator {
    /// `rosidl_typesupport_introspection_c`: plain C structs and `rosidl_runtime_c` containers.
    RosidlC,
    /// `rosidl_typesupport_introspection_cpp`: C++ structs with `std::` containers.
    RosidlCpp,
}

impl TypeGenerator {
    /// Order in which handles are probed. The first generator to claim a handle wins.
    pub const PROBE_ORDER: [Self; 2] = [Self::RosidlC, Self::RosidlCpp];

    /// Identifier passed to a handle's `func` to request this generator's view.
    pub const fn identifier(self) -> &'static CStr {
        match self {
            Self::RosidlC => c"rosidl_typesupport_introspection_c",
            Self::RosidlCpp => c"rosidl_typesupport_introspection_cpp",
        }
    }

    /// Whether boolean sequences have a dedicated packed container (`std::vector<bool>`).
    pub const fn specializes_bool_sequences(self) -> bool {
        matches!(self, Self::RosidlCpp)
    }

    /// Container used for sequences that expose no accessor callbacks.
    pub const fn native_sequence(self) -> SequenceStorage {
        match self {
            Self::RosidlC => SequenceStorage::RosidlC,
            Self::RosidlCpp => SequenceStorage::CppVector,
        }
    }

    /// In-memory representation of string members.
    pub const fn string_repr(self) -> StringRepr {
        match self {
            Self::RosidlC => StringRepr::RosidlC,
            Self::RosidlCpp => StringRepr::Cpp,
        }
    }
}

impl fmt::Display for TypeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier().to_string_lossy())
    }
}
