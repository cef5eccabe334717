// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent registry of resolved message layouts.
//!
//! The TypeRegistry guarantees that a message layout is walked at most once per
//! [`TypeKey`]. Hits are served under a shared read lock. Misses serialize on a
//! re-entrant build lock so that nested messages can be resolved by the thread
//! already building their parent, while other threads wait and then pick up the
//! finished entry instead of building their own copy.
//!
//! The registry is an ordinary value: each middleware session owns one, and
//! entries live exactly as long as it does. Entries are never evicted.

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::ffi::rosidl_message_type_support_t;
use crate::introspection::{self, MessageLayout};
use crate::layout;
use crate::value_type::{StructValueType, TypeKey};
use parking_lot::{ReentrantMutex, RwLock};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ptr::NonNull;
use std::sync::Arc;
use std::time::Instant;

/// Registry hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    /// Message layouts walked (one per inserted entry).
    pub builds: u64,
    /// Resolutions that returned an error.
    pub failures: u64,
    pub last_build_ns: u64,
}

/// Session-scoped cache of [`StructValueType`] trees keyed by layout identity.
pub struct TypeRegistry {
    entries: RwLock<HashMap<TypeKey, Arc<StructValueType>>>,
    /// Keys currently being walked, innermost last.
    building: ReentrantMutex<RefCell<Vec<(TypeKey, String)>>>,
    stats: RwLock<LookupStats>,
    config: RegistryConfig,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(config.capacity_hint)),
            building: ReentrantMutex::new(RefCell::new(Vec::new())),
            stats: RwLock::new(LookupStats::default()),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Resolve a message type support handle into its shared value-type tree.
    ///
    /// Repeated calls for the same layout return the same `Arc`. Nested message
    /// members are resolved through this registry as well.
    ///
    /// # Safety
    ///
    /// `type_support` must be null or point to a `rosidl_message_type_support_t`
    /// whose handle function and introspection tables (including those of every
    /// nested message) stay valid for the lifetime of the process.
    pub unsafe fn resolve(
        &self,
        type_support: *const rosidl_message_type_support_t,
    ) -> Result<Arc<StructValueType>> {
        let Some(handle) = NonNull::new(type_support.cast_mut()) else {
            self.record_failure();
            return Err(Error::NullTypeSupport);
        };

        let Some((generator, members)) = introspection::probe_message(handle) else {
            let identifier = introspection::message_identifier(handle);
            log::warn!("[TypeRegistry] could not identify message typesupport {identifier}");
            self.record_failure();
            return Err(Error::UnrecognizedTypeDescriptor { identifier });
        };
        let key = TypeKey::new(generator, members.as_ptr());

        if let Some(hit) = self.get(&key) {
            self.record_hit();
            return Ok(hit);
        }

        let _build_lock = self.building.lock();
        if let Some(hit) = self.get(&key) {
            self.record_hit();
            return Ok(hit);
        }

        let start = Instant::now();
        let layout = match introspection::read_message_layout(generator, members) {
            Ok(layout) => layout,
            Err(err) => {
                self.record_failure();
                return Err(err);
            }
        };
        log::debug!(
            "[TypeRegistry] building {} via {} ({} members, {} bytes)",
            layout.fqn(),
            generator,
            layout.members.len(),
            layout.size_of
        );

        let mut resolve_nested =
            |nested: NonNull<rosidl_message_type_support_t>| self.resolve(nested.as_ptr());
        let built = self.build(key, &layout, &mut resolve_nested);

        let built = match built {
            Ok(tree) => Arc::new(tree),
            Err(err) => {
                log::debug!("[TypeRegistry] failed to build {}: {}", layout.fqn(), err);
                self.record_failure();
                return Err(err);
            }
        };

        self.entries.write().insert(key, Arc::clone(&built));
        self.record_build(start);
        Ok(built)
    }

    /// Walk `layout` with `key` marked as in progress on this thread.
    fn build<F>(
        &self,
        key: TypeKey,
        layout: &MessageLayout,
        resolve_nested: &mut F,
    ) -> Result<StructValueType>
    where
        F: FnMut(NonNull<rosidl_message_type_support_t>) -> Result<Arc<StructValueType>>,
    {
        let guard = self.building.lock();
        let in_progress = guard
            .borrow()
            .iter()
            .find(|(building, _)| *building == key)
            .map(|(_, name)| name.clone());
        if let Some(type_name) = in_progress {
            log::warn!("[TypeRegistry] {type_name} contains itself");
            return Err(Error::RecursiveType { type_name });
        }

        guard.borrow_mut().push((key, layout.fqn()));
        let _entry = InProgress { stack: &guard };
        layout::walk(layout, key, self.config.validate_layout, resolve_nested)
    }

    /// Look up an already resolved layout without building.
    pub fn get(&self, key: &TypeKey) -> Option<Arc<StructValueType>> {
        self.entries.read().get(key).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_build(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.builds = stats.builds.saturating_add(1);
        stats.last_build_ns = start.elapsed().as_nanos() as u64;
    }

    fn record_failure(&self) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.failures = stats.failures.saturating_add(1);
    }
}

/// Removes the innermost in-progress key when dropped, also during unwinding.
struct InProgress<'a> {
    stack: &'a RefCell<Vec<(TypeKey, String)>>,
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}
