// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `#[repr(C)]` mirrors of the rosidl type support and introspection tables.
//!
//! Layouts follow the Iron/Jazzy headers for `rosidl_message_type_support_t`
//! and the Humble-compatible member tables shared by later distributions.

#![allow(non_camel_case_types)]

use std::ffi::CStr;
use std::os::raw::{c_char, c_void};

pub const ROS_TYPE_FLOAT: u8 = 1;
pub const ROS_TYPE_DOUBLE: u8 = 2;
pub const ROS_TYPE_LONG_DOUBLE: u8 = 3;
pub const ROS_TYPE_CHAR: u8 = 4;
pub const ROS_TYPE_WCHAR: u8 = 5;
pub const ROS_TYPE_BOOLEAN: u8 = 6;
pub const ROS_TYPE_OCTET: u8 = 7;
pub const ROS_TYPE_UINT8: u8 = 8;
pub const ROS_TYPE_INT8: u8 = 9;
pub const ROS_TYPE_UINT16: u8 = 10;
pub const ROS_TYPE_INT16: u8 = 11;
pub const ROS_TYPE_UINT32: u8 = 12;
pub const ROS_TYPE_INT32: u8 = 13;
pub const ROS_TYPE_UINT64: u8 = 14;
pub const ROS_TYPE_INT64: u8 = 15;
pub const ROS_TYPE_STRING: u8 = 16;
pub const ROS_TYPE_WSTRING: u8 = 17;
pub const ROS_TYPE_MESSAGE: u8 = 18;

/// Returns the number of elements in a sequence member.
pub type SizeFunction = unsafe extern "C" fn(*const c_void) -> usize;
/// Returns a const pointer to the element at an index of a sequence member.
pub type GetConstFunction = unsafe extern "C" fn(*const c_void, usize) -> *const c_void;
type GetFunction = Option<unsafe extern "C" fn(*mut c_void, usize) -> *mut c_void>;
type FetchFunction = Option<unsafe extern "C" fn(*const c_void, usize, *mut c_void)>;
type AssignFunction = Option<unsafe extern "C" fn(*mut c_void, usize, *const c_void)>;

pub type MessageTypesupportHandleFunction = Option<
    unsafe extern "C" fn(
        *const rosidl_message_type_support_t,
        *const c_char,
    ) -> *const rosidl_message_type_support_t,
>;

pub type ServiceTypesupportHandleFunction = Option<
    unsafe extern "C" fn(
        *const rosidl_service_type_support_t,
        *const c_char,
    ) -> *const rosidl_service_type_support_t,
>;

type MessageTypeHashFunction = Option<unsafe extern "C" fn(*const rosidl_message_type_support_t) -> *const c_void>;

/// Type support entry point for a ROS 2 message.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct rosidl_message_type_support_t {
    pub typesupport_identifier: *const c_char,
    pub data: *const c_void,
    pub func: MessageTypesupportHandleFunction,
    pub get_type_hash_func: MessageTypeHashFunction,
    pub get_type_description_func: MessageTypeHashFunction,
    pub get_type_description_sources_func: MessageTypeHashFunction,
}

/// Leading fields of a ROS 2 service type support handle.
///
/// Later distributions append event and hash fields; only this prefix is read.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct rosidl_service_type_support_t {
    pub typesupport_identifier: *const c_char,
    pub data: *const c_void,
    pub func: ServiceTypesupportHandleFunction,
}

/// Introspection metadata for one member, `rosidl_typesupport_introspection_c`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct rosidl_typesupport_introspection_c__MessageMember {
    pub name_: *const c_char,
    pub type_id_: u8,
    pub string_upper_bound_: usize,
    pub members_: *const rosidl_message_type_support_t,
    pub is_array_: bool,
    pub array_size_: usize,
    pub is_upper_bound_: bool,
    pub offset_: u32,
    pub default_value_: *const c_void,
    pub size_function: Option<SizeFunction>,
    pub get_const_function: Option<GetConstFunction>,
    pub get_function: GetFunction,
    pub fetch_function: FetchFunction,
    pub assign_function: AssignFunction,
    pub resize_function: Option<unsafe extern "C" fn(*mut c_void, usize) -> bool>,
}

#[repr(C)]
pub struct rosidl_typesupport_introspection_c__MessageMembers {
    pub message_namespace_: *const c_char,
    pub message_name_: *const c_char,
    pub member_count_: u32,
    pub size_of_: usize,
    pub members_: *const rosidl_typesupport_introspection_c__MessageMember,
    pub init_function: Option<unsafe extern "C" fn(*mut c_void, i32)>,
    pub fini_function: Option<unsafe extern "C" fn(*mut c_void)>,
}

#[repr(C)]
pub struct rosidl_typesupport_introspection_c__ServiceMembers {
    pub service_namespace_: *const c_char,
    pub service_name_: *const c_char,
    pub request_members_: *const rosidl_typesupport_introspection_c__MessageMembers,
    pub response_members_: *const rosidl_typesupport_introspection_c__MessageMembers,
}

/// Introspection metadata for one member, `rosidl_typesupport_introspection_cpp`.
///
/// Identical to the C table except that `resize_function` returns nothing.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct rosidl_typesupport_introspection_cpp__MessageMember {
    pub name_: *const c_char,
    pub type_id_: u8,
    pub string_upper_bound_: usize,
    pub members_: *const rosidl_message_type_support_t,
    pub is_array_: bool,
    pub array_size_: usize,
    pub is_upper_bound_: bool,
    pub offset_: u32,
    pub default_value_: *const c_void,
    pub size_function: Option<SizeFunction>,
    pub get_const_function: Option<GetConstFunction>,
    pub get_function: GetFunction,
    pub fetch_function: FetchFunction,
    pub assign_function: AssignFunction,
    pub resize_function: Option<unsafe extern "C" fn(*mut c_void, usize)>,
}

#[repr(C)]
pub struct rosidl_typesupport_introspection_cpp__MessageMembers {
    pub message_namespace_: *const c_char,
    pub message_name_: *const c_char,
    pub member_count_: u32,
    pub size_of_: usize,
    pub members_: *const rosidl_typesupport_introspection_cpp__MessageMember,
    pub init_function: Option<unsafe extern "C" fn(*mut c_void, i32)>,
    pub fini_function: Option<unsafe extern "C" fn(*mut c_void)>,
}

#[repr(C)]
pub struct rosidl_typesupport_introspection_cpp__ServiceMembers {
    pub service_namespace_: *const c_char,
    pub service_name_: *const c_char,
    pub request_members_: *const rosidl_typesupport_introspection_cpp__MessageMembers,
    pub response_members_: *const rosidl_typesupport_introspection_cpp__MessageMembers,
}

/// Header shared by every `rosidl_runtime_c__*__Sequence` and `rosidl_runtime_c__String`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct rosidl_runtime_c__Sequence {
    pub data: *const c_void,
    pub size: usize,
    pub capacity: usize,
}

/// libstdc++ `std::vector<T>` storage triple.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct std_vector_header {
    pub begin: *const c_void,
    pub end: *const c_void,
    pub end_of_storage: *const c_void,
}

/// Handle function for message type supports that only answer their own identifier.
///
/// Mirrors `get_message_typesupport_handle_function` from `rosidl_typesupport_c`:
/// returns `handle` when `identifier` equals the handle's identifier, null otherwise.
///
/// # Safety
///
/// `handle` must be null or point to a valid type support whose identifier is null or
/// a NUL-terminated string; `identifier` must be null or NUL-terminated.
pub unsafe extern "C" fn message_typesupport_handle_function(
    handle: *const rosidl_message_type_support_t,
    identifier: *const c_char,
) -> *const rosidl_message_type_support_t {
    if handle.is_null() || identifier.is_null() {
        return std::ptr::null();
    }
    let own = (*handle).typesupport_identifier;
    if !own.is_null() && CStr::from_ptr(own) == CStr::from_ptr(identifier) {
        handle
    } else {
        std::ptr::null()
    }
}

/// Service counterpart of [`message_typesupport_handle_function`].
///
/// # Safety
///
/// Same contract as [`message_typesupport_handle_function`].
pub unsafe extern "C" fn service_typesupport_handle_function(
    handle: *const rosidl_service_type_support_t,
    identifier: *const c_char,
) -> *const rosidl_service_type_support_t {
    if handle.is_null() || identifier.is_null() {
        return std::ptr::null();
    }
    let own = (*handle).typesupport_identifier;
    if !own.is_null() && CStr::from_ptr(own) == CStr::from_ptr(identifier) {
        handle
    } else {
        std::ptr::null()
    }
}

/// Read a possibly-null C string, mapping null to the empty string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn str_or_empty<'a>(ptr: *const c_char) -> Result<&'a str, std::str::Utf8Error> {
    if ptr.is_null() {
        Ok("")
    } else {
        CStr::from_ptr(ptr).to_str()
    }
}
