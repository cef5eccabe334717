// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end resolution of message and service type supports.

#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::cast_possible_truncation)] // Test parameters

use hdds_typesupport::ffi::{
    self, rosidl_message_type_support_t, rosidl_service_type_support_t,
    rosidl_typesupport_introspection_c__MessageMember as CMember,
    rosidl_typesupport_introspection_c__MessageMembers as CMembers,
    rosidl_typesupport_introspection_c__ServiceMembers as CServiceMembers,
    rosidl_typesupport_introspection_cpp__MessageMember as CppMember,
    rosidl_typesupport_introspection_cpp__MessageMembers as CppMembers,
    rosidl_typesupport_introspection_cpp__ServiceMembers as CppServiceMembers,
};
use hdds_typesupport::{
    split_service, Error, PrimitiveKind, RegistryConfig, TypeGenerator, TypeRegistry, ValueType,
};
use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

fn c_field(name: &'static CStr, type_id: u8, offset: u32) -> CMember {
    CMember {
        name_: name.as_ptr(),
        type_id_: type_id,
        string_upper_bound_: 0,
        members_: ptr::null(),
        is_array_: false,
        array_size_: 0,
        is_upper_bound_: false,
        offset_: offset,
        default_value_: ptr::null(),
        size_function: None,
        get_const_function: None,
        get_function: None,
        fetch_function: None,
        assign_function: None,
        resize_function: None,
    }
}

fn cpp_field(name: &'static CStr, type_id: u8, offset: u32) -> CppMember {
    CppMember {
        name_: name.as_ptr(),
        type_id_: type_id,
        string_upper_bound_: 0,
        members_: ptr::null(),
        is_array_: false,
        array_size_: 0,
        is_upper_bound_: false,
        offset_: offset,
        default_value_: ptr::null(),
        size_function: None,
        get_const_function: None,
        get_function: None,
        fetch_function: None,
        assign_function: None,
        resize_function: None,
    }
}

fn c_table(name: &'static CStr, size_of: usize, fields: Vec<CMember>) -> &'static CMembers {
    let count = fields.len() as u32;
    let fields: &'static [CMember] = Box::leak(fields.into_boxed_slice());
    Box::leak(Box::new(CMembers {
        message_namespace_: c"example_interfaces__srv".as_ptr(),
        message_name_: name.as_ptr(),
        member_count_: count,
        size_of_: size_of,
        members_: fields.as_ptr(),
        init_function: None,
        fini_function: None,
    }))
}

fn cpp_table(name: &'static CStr, size_of: usize, fields: Vec<CppMember>) -> &'static CppMembers {
    let count = fields.len() as u32;
    let fields: &'static [CppMember] = Box::leak(fields.into_boxed_slice());
    Box::leak(Box::new(CppMembers {
        message_namespace_: c"example_interfaces__srv".as_ptr(),
        message_name_: name.as_ptr(),
        member_count_: count,
        size_of_: size_of,
        members_: fields.as_ptr(),
        init_function: None,
        fini_function: None,
    }))
}

fn message_handle(generator: TypeGenerator, data: *const c_void) -> rosidl_message_type_support_t {
    rosidl_message_type_support_t {
        typesupport_identifier: generator.identifier().as_ptr(),
        data,
        func: Some(ffi::message_typesupport_handle_function),
        get_type_hash_func: None,
        get_type_description_func: None,
        get_type_description_sources_func: None,
    }
}

fn service_handle(generator: TypeGenerator, data: *const c_void) -> rosidl_service_type_support_t {
    rosidl_service_type_support_t {
        typesupport_identifier: generator.identifier().as_ptr(),
        data,
        func: Some(ffi::service_typesupport_handle_function),
    }
}

/// `AddThreeInts`-style request (`int32 a, b, c`) and a 20-byte response.
fn add_three_ints_c() -> (&'static CMembers, &'static CMembers, rosidl_service_type_support_t) {
    let request = c_table(
        c"AddThreeInts_Request",
        12,
        vec![
            c_field(c"a", ffi::ROS_TYPE_INT32, 0),
            c_field(c"b", ffi::ROS_TYPE_INT32, 4),
            c_field(c"c", ffi::ROS_TYPE_INT32, 8),
        ],
    );
    let response = c_table(
        c"AddThreeInts_Response",
        20,
        vec![
            c_field(c"sum", ffi::ROS_TYPE_INT64, 0),
            c_field(c"carry", ffi::ROS_TYPE_INT64, 8),
            c_field(c"flags", ffi::ROS_TYPE_UINT32, 16),
        ],
    );
    let members: &'static CServiceMembers = Box::leak(Box::new(CServiceMembers {
        service_namespace_: c"example_interfaces__srv".as_ptr(),
        service_name_: c"AddThreeInts".as_ptr(),
        request_members_: request,
        response_members_: response,
    }));
    let service = service_handle(TypeGenerator::RosidlC, ptr::from_ref(members).cast());
    (request, response, service)
}

#[test]
fn service_halves_resolve_separately() {
    let (_, _, service) = add_three_ints_c();
    let registry = TypeRegistry::new();

    // SAFETY: all tables are leaked; the halves are resolved while still in scope.
    let (request, response) = unsafe {
        let (request, response) = split_service(&service).expect("split service");
        (
            registry.resolve(&request).expect("resolve request"),
            registry.resolve(&response).expect("resolve response"),
        )
    };

    assert_eq!(request.sizeof_struct(), 12);
    assert_eq!(response.sizeof_struct(), 20);
    assert_eq!(request.type_name(), "example_interfaces::srv::AddThreeInts_Request");
    assert_eq!(response.type_name(), "example_interfaces::srv::AddThreeInts_Response");
    assert_ne!(request.key(), response.key());
    assert_eq!(registry.len(), 2);

    let carry = response.member_by_name("carry").expect("carry member");
    assert_eq!(carry.member_offset, 8);
    assert_eq!(carry.next_member_offset, 16);
    assert!(matches!(carry.value_type, ValueType::Primitive(PrimitiveKind::Int64)));
}

#[test]
fn service_half_shares_entry_with_message_handle() {
    let (request_table, _, service) = add_three_ints_c();
    let direct = message_handle(TypeGenerator::RosidlC, ptr::from_ref(request_table).cast());
    let registry = TypeRegistry::new();

    // SAFETY: all tables are leaked; the halves are resolved while still in scope.
    let (from_message, from_service) = unsafe {
        let (request, _) = split_service(&service).expect("split service");
        (
            registry.resolve(&direct).expect("resolve message"),
            registry.resolve(&request).expect("resolve request half"),
        )
    };

    assert!(Arc::ptr_eq(&from_message, &from_service));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.stats().builds, 1);
    assert_eq!(registry.stats().hits, 1);
}

#[test]
fn cpp_service_halves_keep_cpp_identifier() {
    let request = cpp_table(
        c"SetName_Request",
        32,
        vec![cpp_field(c"name", ffi::ROS_TYPE_STRING, 0)],
    );
    let response = cpp_table(
        c"SetName_Response",
        1,
        vec![cpp_field(c"ok", ffi::ROS_TYPE_BOOLEAN, 0)],
    );
    let members: &'static CppServiceMembers = Box::leak(Box::new(CppServiceMembers {
        service_namespace_: c"example_interfaces__srv".as_ptr(),
        service_name_: c"SetName".as_ptr(),
        request_members_: request,
        response_members_: response,
    }));
    let service = service_handle(TypeGenerator::RosidlCpp, ptr::from_ref(members).cast());
    let registry = TypeRegistry::new();

    // SAFETY: all tables are leaked; the halves are resolved while still in scope.
    unsafe {
        let (request_half, response_half) = split_service(&service).expect("split service");
        assert_eq!(
            CStr::from_ptr(request_half.typesupport_identifier),
            TypeGenerator::RosidlCpp.identifier()
        );
        assert_eq!(request_half.data, ptr::from_ref(request).cast::<c_void>());
        assert_eq!(response_half.data, ptr::from_ref(response).cast::<c_void>());

        let resolved = registry.resolve(&response_half).expect("resolve response");
        assert_eq!(resolved.generator(), TypeGenerator::RosidlCpp);
        assert!(matches!(
            resolved.members()[0].value_type,
            ValueType::Primitive(PrimitiveKind::Boolean)
        ));
    }
}

#[test]
fn foreign_service_is_unrecognized() {
    let service = rosidl_service_type_support_t {
        typesupport_identifier: c"rosidl_typesupport_fastrtps_c".as_ptr(),
        data: ptr::null(),
        func: Some(ffi::service_typesupport_handle_function),
    };
    let registry = TypeRegistry::with_config(RegistryConfig::default());

    // SAFETY: `service` outlives the call.
    let err = unsafe { split_service(&service) }.expect_err("foreign service");
    assert!(matches!(
        err,
        Error::UnrecognizedTypeDescriptor { ref identifier } if identifier == "rosidl_typesupport_fastrtps_c"
    ));
    assert!(registry.is_empty());
}
