// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value-type model: how to interpret a region of message memory.
//!
//! A [`StructValueType`] lists every member of a message with its byte offset,
//! the offset where its storage ends, and a [`ValueType`] describing the shape
//! of that storage. Trees are immutable once built and shared through `Arc`;
//! nested messages point at the single instance owned by the
//! [`TypeRegistry`](crate::TypeRegistry).

use crate::ffi::{
    rosidl_runtime_c__Sequence, std_vector_header, GetConstFunction, SizeFunction,
};
use crate::generator::TypeGenerator;
use std::fmt;
use std::os::raw::c_void;
use std::sync::Arc;

/// Scalar member kinds, one per rosidl primitive type id.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Float32,
    Float64,
    LongDouble,
    Char,
    WChar,
    Boolean,
    Octet,
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
}

impl PrimitiveKind {
    /// Map a rosidl `type_id_` to a scalar kind. Returns `None` for strings,
    /// nested messages and unknown ids.
    pub const fn from_type_id(type_id: u8) -> Option<Self> {
        use crate::ffi::*;

        Some(match type_id {
            ROS_TYPE_FLOAT => Self::Float32,
            ROS_TYPE_DOUBLE => Self::Float64,
            ROS_TYPE_LONG_DOUBLE => Self::LongDouble,
            ROS_TYPE_CHAR => Self::Char,
            ROS_TYPE_WCHAR => Self::WChar,
            ROS_TYPE_BOOLEAN => Self::Boolean,
            ROS_TYPE_OCTET => Self::Octet,
            ROS_TYPE_UINT8 => Self::UInt8,
            ROS_TYPE_INT8 => Self::Int8,
            ROS_TYPE_UINT16 => Self::UInt16,
            ROS_TYPE_INT16 => Self::Int16,
            ROS_TYPE_UINT32 => Self::UInt32,
            ROS_TYPE_INT32 => Self::Int32,
            ROS_TYPE_UINT64 => Self::UInt64,
            ROS_TYPE_INT64 => Self::Int64,
            _ => return None,
        })
    }

    /// Native width in bytes.
    pub const fn size_of(self) -> usize {
        match self {
            Self::Char | Self::Boolean | Self::Octet | Self::UInt8 | Self::Int8 => 1,
            Self::WChar | Self::UInt16 | Self::Int16 => 2,
            Self::Float32 | Self::UInt32 | Self::Int32 => 4,
            Self::Float64 | Self::UInt64 | Self::Int64 => 8,
            Self::LongDouble => 16,
        }
    }
}

/// Native representation of a string member.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StringRepr {
    /// `rosidl_runtime_c__String` / `rosidl_runtime_c__U16String`.
    RosidlC,
    /// `std::string` / `std::u16string`.
    Cpp,
}

/// Backing storage of a variable-length sequence member.
#[derive(Clone, Copy)]
pub enum SequenceStorage {
    /// `rosidl_runtime_c__*__Sequence` header, addressed directly.
    RosidlC,
    /// `std::vector<T>` storage triple, addressed directly.
    CppVector,
    /// Storage is opaque; length and elements come from generator callbacks.
    ///
    /// Some generators publish only the size callback.
    Callbacks {
        size: SizeFunction,
        get_const: Option<GetConstFunction>,
    },
}

impl SequenceStorage {
    /// Number of elements currently stored.
    ///
    /// # Safety
    ///
    /// `sequence` must point at a live member of the type this storage was built for.
    /// `element_size` must be the native size of one element (ignored for callbacks).
    pub unsafe fn len(&self, sequence: *const c_void, element_size: usize) -> usize {
        match self {
            Self::RosidlC => (*sequence.cast::<rosidl_runtime_c__Sequence>()).size,
            Self::CppVector => {
                let header = &*sequence.cast::<std_vector_header>();
                if element_size == 0 || header.begin.is_null() {
                    0
                } else {
                    (header.end as usize - header.begin as usize) / element_size
                }
            }
            Self::Callbacks { size, .. } => size(sequence),
        }
    }

    /// Const pointer to the element at `index`.
    ///
    /// # Safety
    ///
    /// Same contract as [`len`](Self::len); `index` must be below the current length.
    /// Returns null for callback storage without an element accessor.
    pub unsafe fn element_ptr(
        &self,
        sequence: *const c_void,
        index: usize,
        element_size: usize,
    ) -> *const c_void {
        match self {
            Self::RosidlC => {
                let header = &*sequence.cast::<rosidl_runtime_c__Sequence>();
                header.data.cast::<u8>().add(index * element_size).cast()
            }
            Self::CppVector => {
                let header = &*sequence.cast::<std_vector_header>();
                header.begin.cast::<u8>().add(index * element_size).cast()
            }
            Self::Callbacks { get_const, .. } => match get_const {
                Some(get_const) => get_const(sequence, index),
                None => std::ptr::null(),
            },
        }
    }
}

impl fmt::Debug for SequenceStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RosidlC => f.write_str("RosidlC"),
            Self::CppVector => f.write_str("CppVector"),
            Self::Callbacks { .. } => f.write_str("Callbacks"),
        }
    }
}

static BOOLEAN: ValueType = ValueType::Primitive(PrimitiveKind::Boolean);

/// Shape of one member's storage.
#[derive(Clone, Debug)]
pub enum ValueType {
    Primitive(PrimitiveKind),
    String {
        bound: Option<usize>,
        repr: StringRepr,
    },
    WideString {
        bound: Option<usize>,
        repr: StringRepr,
    },
    /// Nested message; shares the registry's instance.
    Struct(Arc<StructValueType>),
    FixedArray {
        element: Box<ValueType>,
        count: usize,
    },
    BoundedSequence {
        element: Box<ValueType>,
        bound: usize,
        storage: SequenceStorage,
    },
    UnboundedSequence {
        element: Box<ValueType>,
        storage: SequenceStorage,
    },
    /// `std::vector<bool>`: bit-packed, no addressable elements.
    BoolVector,
}

impl ValueType {
    /// Element type of arrays and sequences.
    pub fn element(&self) -> Option<&ValueType> {
        match self {
            Self::FixedArray { element, .. }
            | Self::BoundedSequence { element, .. }
            | Self::UnboundedSequence { element, .. } => Some(element),
            Self::BoolVector => Some(&BOOLEAN),
            _ => None,
        }
    }

    /// Sequence storage, for sequence variants.
    pub fn storage(&self) -> Option<&SequenceStorage> {
        match self {
            Self::BoundedSequence { storage, .. } | Self::UnboundedSequence { storage, .. } => {
                Some(storage)
            }
            _ => None,
        }
    }

    /// Nested message tree, for struct members.
    pub fn as_struct(&self) -> Option<&Arc<StructValueType>> {
        match self {
            Self::Struct(inner) => Some(inner),
            _ => None,
        }
    }

    /// Native extent in bytes when it does not depend on the container implementation.
    pub fn value_size(&self) -> Option<usize> {
        match self {
            Self::Primitive(kind) => Some(kind.size_of()),
            Self::Struct(inner) => Some(inner.sizeof_struct()),
            Self::FixedArray { element, count } => {
                element.value_size().and_then(|size| size.checked_mul(*count))
            }
            _ => None,
        }
    }

    /// Short variant name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::String { .. } => "string",
            Self::WideString { .. } => "wstring",
            Self::Struct(_) => "struct",
            Self::FixedArray { .. } => "array",
            Self::BoundedSequence { .. } => "bounded_sequence",
            Self::UnboundedSequence { .. } => "sequence",
            Self::BoolVector => "bool_vector",
        }
    }
}

/// Member of a message: where it lives and what it holds.
#[derive(Clone, Debug)]
pub struct Member {
    pub name: String,
    pub value_type: ValueType,
    /// Byte offset from the start of the struct.
    pub member_offset: usize,
    /// Offset of the following member, or the struct size for the last member.
    pub next_member_offset: usize,
}

impl Member {
    /// Bytes between this member's offset and the next member (storage plus padding).
    ///
    /// Zero when offsets are out of order, which only an unvalidated layout allows.
    pub fn extent(&self) -> usize {
        self.next_member_offset.saturating_sub(self.member_offset)
    }
}

/// Identity of a message layout: the generator and the address of its member table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TypeKey {
    generator: TypeGenerator,
    members: usize,
}

impl TypeKey {
    pub(crate) fn new(generator: TypeGenerator, members: *const c_void) -> Self {
        Self {
            generator,
            members: members as usize,
        }
    }

    pub fn generator(&self) -> TypeGenerator {
        self.generator
    }
}

/// Fully resolved message layout.
#[derive(Debug)]
pub struct StructValueType {
    key: TypeKey,
    type_name: String,
    sizeof_struct: usize,
    members: Vec<Member>,
}

impl StructValueType {
    pub(crate) fn new(
        key: TypeKey,
        type_name: String,
        sizeof_struct: usize,
        members: Vec<Member>,
    ) -> Self {
        Self {
            key,
            type_name,
            sizeof_struct,
            members,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Fully-qualified name, e.g. `geometry_msgs::msg::Point`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn generator(&self) -> TypeGenerator {
        self.key.generator
    }

    pub fn sizeof_struct(&self) -> usize {
        self.sizeof_struct
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    pub fn member(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }
}
