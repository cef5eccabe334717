// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Split a service type support into request and response message handles.

use crate::error::{Error, Result};
use crate::ffi::{
    message_typesupport_handle_function, rosidl_message_type_support_t,
    rosidl_service_type_support_t,
};
use crate::generator::TypeGenerator;
use crate::introspection;
use std::os::raw::c_void;
use std::ptr::NonNull;

/// Produce standalone request and response message type supports for a service.
///
/// Each half carries the identifier of the generator that recognised the service
/// and answers only to it, so it can be passed straight to
/// [`TypeRegistry::resolve`](crate::TypeRegistry::resolve). Nothing is cached here.
///
/// # Safety
///
/// `service_type_support` must be null or point to a valid
/// `rosidl_service_type_support_t` whose introspection tables outlive the
/// returned handles.
pub unsafe fn split_service(
    service_type_support: *const rosidl_service_type_support_t,
) -> Result<(rosidl_message_type_support_t, rosidl_message_type_support_t)> {
    let handle =
        NonNull::new(service_type_support.cast_mut()).ok_or(Error::NullTypeSupport)?;

    let Some((generator, service_members)) = introspection::probe_service(handle) else {
        let identifier = introspection::service_identifier(handle);
        log::warn!("[split_service] unidentified service typesupport {identifier}");
        return Err(Error::UnrecognizedTypeDescriptor { identifier });
    };

    let (request, response) = introspection::service_message_tables(generator, service_members);
    log::debug!(
        "[split_service] {} request={:p} response={:p}",
        generator,
        request,
        response
    );
    Ok((message_half(generator, request), message_half(generator, response)))
}

fn message_half(generator: TypeGenerator, members: *const c_void) -> rosidl_message_type_support_t {
    rosidl_message_type_support_t {
        typesupport_identifier: generator.identifier().as_ptr(),
        data: members,
        func: Some(message_typesupport_handle_function),
        get_type_hash_func: None,
        get_type_description_func: None,
        get_type_description_sources_func: None,
    }
}
