// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Layout walker: one [`MessageLayout`] in, one [`StructValueType`] out.
//!
//! Both generators share the walk; their differences live in
//! [`TypeGenerator`] (boolean vectors, native containers, string layout).

use crate::error::{Error, Result};
use crate::ffi::{
    rosidl_message_type_support_t, ROS_TYPE_BOOLEAN, ROS_TYPE_MESSAGE, ROS_TYPE_STRING,
    ROS_TYPE_WSTRING,
};
use crate::generator::TypeGenerator;
use crate::introspection::{MemberLayout, MessageLayout};
use crate::value_type::{
    Member, PrimitiveKind, SequenceStorage, StructValueType, TypeKey, ValueType,
};
use std::ptr::NonNull;
use std::sync::Arc;

/// Build the value-type tree for one message level.
///
/// Nested message members are handed to `resolve_nested`, which is expected to
/// return the shared tree for that handle. Any error aborts the whole walk.
pub(crate) fn walk<F>(
    layout: &MessageLayout,
    key: TypeKey,
    validate: bool,
    resolve_nested: &mut F,
) -> Result<StructValueType>
where
    F: FnMut(NonNull<rosidl_message_type_support_t>) -> Result<Arc<StructValueType>>,
{
    let fqn = layout.fqn();
    if validate {
        validate_offsets(layout, &fqn)?;
    }

    let mut members = Vec::with_capacity(layout.members.len());
    for (index, member) in layout.members.iter().enumerate() {
        let next_member_offset = layout
            .members
            .get(index + 1)
            .map_or(layout.size_of, |next| next.offset);

        let element = element_type(layout.generator, member, &fqn, resolve_nested)?;
        let value_type = member_type(layout.generator, member, element);
        log::trace!(
            "[layout] {}.{} @{}..{} {}",
            fqn,
            member.name,
            member.offset,
            next_member_offset,
            value_type.kind_name()
        );

        members.push(Member {
            name: member.name.clone(),
            value_type,
            member_offset: member.offset,
            next_member_offset,
        });
    }

    Ok(StructValueType::new(key, fqn, layout.size_of, members))
}

fn validate_offsets(layout: &MessageLayout, fqn: &str) -> Result<()> {
    let mut previous = 0usize;
    for member in &layout.members {
        if member.offset < previous {
            log::warn!(
                "[layout] {} member {} at offset {} precedes offset {}",
                fqn,
                member.name,
                member.offset,
                previous
            );
            return Err(Error::malformed(
                fqn,
                format!(
                    "member {} at offset {} precedes previous member at {}",
                    member.name, member.offset, previous
                ),
            ));
        }
        if member.offset > layout.size_of {
            log::warn!(
                "[layout] {} member {} at offset {} beyond struct size {}",
                fqn,
                member.name,
                member.offset,
                layout.size_of
            );
            return Err(Error::malformed(
                fqn,
                format!(
                    "member {} at offset {} lies beyond struct size {}",
                    member.name, member.offset, layout.size_of
                ),
            ));
        }
        previous = member.offset;
    }
    Ok(())
}

/// Classify what a single element of the member is.
fn element_type<F>(
    generator: TypeGenerator,
    member: &MemberLayout,
    fqn: &str,
    resolve_nested: &mut F,
) -> Result<ValueType>
where
    F: FnMut(NonNull<rosidl_message_type_support_t>) -> Result<Arc<StructValueType>>,
{
    let bound = (member.string_upper_bound != 0).then_some(member.string_upper_bound);
    match member.type_id {
        ROS_TYPE_MESSAGE => {
            let nested = member.nested.ok_or_else(|| {
                Error::malformed(fqn, format!("nested member {} has no type support", member.name))
            })?;
            resolve_nested(nested).map(ValueType::Struct)
        }
        ROS_TYPE_STRING => Ok(ValueType::String {
            bound,
            repr: generator.string_repr(),
        }),
        ROS_TYPE_WSTRING => Ok(ValueType::WideString {
            bound,
            repr: generator.string_repr(),
        }),
        other => PrimitiveKind::from_type_id(other)
            .map(ValueType::Primitive)
            .ok_or_else(|| Error::UnsupportedType {
                member: format!("{fqn}.{}", member.name),
                type_id: other,
            }),
    }
}

/// Apply the member's multiplicity on top of its element type.
///
/// Precedence: scalar, fixed array, packed bool vector, callback sequence,
/// native container.
fn member_type(generator: TypeGenerator, member: &MemberLayout, element: ValueType) -> ValueType {
    if !member.is_array {
        return element;
    }
    if member.array_size != 0 && !member.is_upper_bound {
        return ValueType::FixedArray {
            element: Box::new(element),
            count: member.array_size,
        };
    }
    if member.type_id == ROS_TYPE_BOOLEAN && generator.specializes_bool_sequences() {
        return ValueType::BoolVector;
    }

    // Storage behind a size callback is opaque, with or without an element accessor.
    let storage = match member.size_function {
        Some(size) => SequenceStorage::Callbacks {
            size,
            get_const: member.get_const_function,
        },
        None => generator.native_sequence(),
    };
    if member.is_upper_bound {
        ValueType::BoundedSequence {
            element: Box::new(element),
            bound: member.array_size,
            storage,
        }
    } else {
        ValueType::UnboundedSequence {
            element: Box::new(element),
            storage,
        }
    }
}
