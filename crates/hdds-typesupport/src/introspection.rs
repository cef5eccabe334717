// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generator discovery and safe views over rosidl introspection tables.
//!
//! Probing asks a handle for each generator's view in [`TypeGenerator::PROBE_ORDER`].
//! A generator that does not recognise the handle answers null, which is a normal
//! outcome. Once a generator is found, its member table is copied into a
//! [`MessageLayout`], the same shape for both generators, so the layout walker
//! never touches raw tables.

use crate::error::{Error, Result};
use crate::ffi::{
    self, rosidl_message_type_support_t, rosidl_service_type_support_t,
    rosidl_typesupport_introspection_c__MessageMember,
    rosidl_typesupport_introspection_c__MessageMembers,
    rosidl_typesupport_introspection_c__ServiceMembers,
    rosidl_typesupport_introspection_cpp__MessageMember,
    rosidl_typesupport_introspection_cpp__MessageMembers,
    rosidl_typesupport_introspection_cpp__ServiceMembers, GetConstFunction, SizeFunction,
};
use crate::generator::TypeGenerator;
use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::ptr::NonNull;

/// One member as reported by a generator.
#[derive(Clone, Debug)]
pub struct MemberLayout {
    pub name: String,
    pub type_id: u8,
    pub string_upper_bound: usize,
    pub offset: usize,
    pub is_array: bool,
    pub array_size: usize,
    pub is_upper_bound: bool,
    pub size_function: Option<SizeFunction>,
    pub get_const_function: Option<GetConstFunction>,
    /// Type support of the nested message, for `ROS_TYPE_MESSAGE` members.
    pub nested: Option<NonNull<rosidl_message_type_support_t>>,
}

/// A message's member table as reported by one generator.
#[derive(Clone, Debug)]
pub struct MessageLayout {
    pub generator: TypeGenerator,
    pub namespace: String,
    pub name: String,
    pub size_of: usize,
    pub members: Vec<MemberLayout>,
}

impl MessageLayout {
    /// Fully-qualified name (`namespace::name`).
    pub fn fqn(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }
}

/// Turn rosidl's `pkg__msg` namespace into `pkg::msg`.
pub(crate) fn normalize_namespace(raw: &str) -> String {
    raw.split("__")
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("::")
}

/// Identifier string reported by a message handle, for error messages.
///
/// # Safety
///
/// `handle` must point to a valid type support.
pub unsafe fn message_identifier(handle: NonNull<rosidl_message_type_support_t>) -> String {
    identifier_lossy(handle.as_ref().typesupport_identifier)
}

/// # Safety
///
/// `handle` must point to a valid service type support.
pub unsafe fn service_identifier(handle: NonNull<rosidl_service_type_support_t>) -> String {
    identifier_lossy(handle.as_ref().typesupport_identifier)
}

unsafe fn identifier_lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        "<null>".to_string()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Ask a message handle for one generator's view.
///
/// Handles without a `func` only answer to their own identifier.
unsafe fn probe_message_with(
    handle: NonNull<rosidl_message_type_support_t>,
    generator: TypeGenerator,
) -> Option<NonNull<c_void>> {
    let raw = handle.as_ptr().cast_const();
    let found = match handle.as_ref().func {
        Some(func) => func(raw, generator.identifier().as_ptr()),
        None => ffi::message_typesupport_handle_function(raw, generator.identifier().as_ptr()),
    };
    NonNull::new(found.cast_mut()).and_then(|ts| NonNull::new(ts.as_ref().data.cast_mut()))
}

unsafe fn probe_service_with(
    handle: NonNull<rosidl_service_type_support_t>,
    generator: TypeGenerator,
) -> Option<NonNull<c_void>> {
    let raw = handle.as_ptr().cast_const();
    let found = match handle.as_ref().func {
        Some(func) => func(raw, generator.identifier().as_ptr()),
        None => ffi::service_typesupport_handle_function(raw, generator.identifier().as_ptr()),
    };
    NonNull::new(found.cast_mut()).and_then(|ts| NonNull::new(ts.as_ref().data.cast_mut()))
}

/// Find the first generator that recognises a message handle.
///
/// Returns the generator and its `MessageMembers` table.
///
/// # Safety
///
/// `handle` must point to a valid type support whose `func` (if any) is safe to call.
pub unsafe fn probe_message(
    handle: NonNull<rosidl_message_type_support_t>,
) -> Option<(TypeGenerator, NonNull<c_void>)> {
    TypeGenerator::PROBE_ORDER.into_iter().find_map(|generator| {
        let found = probe_message_with(handle, generator);
        log::trace!(
            "[introspection] probe {} -> {}",
            generator,
            if found.is_some() { "hit" } else { "miss" }
        );
        found.map(|members| (generator, members))
    })
}

/// Find the first generator that recognises a service handle.
///
/// Returns the generator and its `ServiceMembers` table.
///
/// # Safety
///
/// Same contract as [`probe_message`].
pub unsafe fn probe_service(
    handle: NonNull<rosidl_service_type_support_t>,
) -> Option<(TypeGenerator, NonNull<c_void>)> {
    TypeGenerator::PROBE_ORDER
        .into_iter()
        .find_map(|generator| probe_service_with(handle, generator).map(|svc| (generator, svc)))
}

/// Request and response `MessageMembers` tables of a service.
///
/// # Safety
///
/// `service_members` must be the `ServiceMembers` table `generator` returned from probing.
pub unsafe fn service_message_tables(
    generator: TypeGenerator,
    service_members: NonNull<c_void>,
) -> (*const c_void, *const c_void) {
    match generator {
        TypeGenerator::RosidlC => {
            let svc = service_members
                .cast::<rosidl_typesupport_introspection_c__ServiceMembers>()
                .as_ref();
            (svc.request_members_.cast(), svc.response_members_.cast())
        }
        TypeGenerator::RosidlCpp => {
            let svc = service_members
                .cast::<rosidl_typesupport_introspection_cpp__ServiceMembers>()
                .as_ref();
            (svc.request_members_.cast(), svc.response_members_.cast())
        }
    }
}

/// Fields common to both generators' member tables.
trait RawMember {
    fn name_ptr(&self) -> *const c_char;
    fn layout(&self, name: String) -> MemberLayout;
}

macro_rules! impl_raw_member {
    ($($ty:ty),+) => {$(
        impl RawMember for $ty {
            fn name_ptr(&self) -> *const c_char {
                self.name_
            }

            fn layout(&self, name: String) -> MemberLayout {
                MemberLayout {
                    name,
                    type_id: self.type_id_,
                    string_upper_bound: self.string_upper_bound_,
                    offset: self.offset_ as usize,
                    is_array: self.is_array_,
                    array_size: self.array_size_,
                    is_upper_bound: self.is_upper_bound_,
                    size_function: self.size_function,
                    get_const_function: self.get_const_function,
                    nested: NonNull::new(self.members_.cast_mut()),
                }
            }
        }
    )+};
}

impl_raw_member!(
    rosidl_typesupport_introspection_c__MessageMember,
    rosidl_typesupport_introspection_cpp__MessageMember
);

unsafe fn read_table<M: RawMember>(
    generator: TypeGenerator,
    namespace: *const c_char,
    name: *const c_char,
    member_count: u32,
    size_of: usize,
    members: *const M,
) -> Result<MessageLayout> {
    let namespace = normalize_namespace(ffi::str_or_empty(namespace)?);
    let name = ffi::str_or_empty(name)?.to_string();
    let mut layout = MessageLayout {
        generator,
        namespace,
        name,
        size_of,
        members: Vec::with_capacity(member_count as usize),
    };

    if member_count == 0 {
        return Ok(layout);
    }
    if members.is_null() {
        return Err(Error::malformed(
            &layout.fqn(),
            format!("{member_count} members declared but member table is null"),
        ));
    }

    for raw in std::slice::from_raw_parts(members, member_count as usize) {
        if raw.name_ptr().is_null() {
            return Err(Error::malformed(&layout.fqn(), "member without a name"));
        }
        let member_name = CStr::from_ptr(raw.name_ptr()).to_str()?.to_string();
        layout.members.push(raw.layout(member_name));
    }
    Ok(layout)
}

/// Copy a generator's `MessageMembers` table into a [`MessageLayout`].
///
/// # Safety
///
/// `members` must be the table `generator` returned from probing, with all
/// strings and the member array alive for the duration of the call.
pub unsafe fn read_message_layout(
    generator: TypeGenerator,
    members: NonNull<c_void>,
) -> Result<MessageLayout> {
    match generator {
        TypeGenerator::RosidlC => {
            let table = members
                .cast::<rosidl_typesupport_introspection_c__MessageMembers>()
                .as_ref();
            read_table(
                generator,
                table.message_namespace_,
                table.message_name_,
                table.member_count_,
                table.size_of_,
                table.members_,
            )
        }
        TypeGenerator::RosidlCpp => {
            let table = members
                .cast::<rosidl_typesupport_introspection_cpp__MessageMembers>()
                .as_ref();
            read_table(
                generator,
                table.message_namespace_,
                table.message_name_,
                table.member_count_,
                table.size_of_,
                table.members_,
            )
        }
    }
}
