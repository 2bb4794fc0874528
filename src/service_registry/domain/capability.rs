//! Type-erased capability implementations.

use super::CapabilityCallError;
use serde_json::Value;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Signature of a capability that follows the JSON calling convention.
pub type CapabilityFn = dyn Fn(Value) -> Result<Value, CapabilityCallError> + Send + Sync;

/// Wrapper stored inside handles created by [`CapabilityHandle::callable`].
struct CallableCapability(Box<CapabilityFn>);

/// Opaque handle to a capability implementation.
///
/// The registry imposes no contract on what a module publishes. Two calling
/// conventions are supported:
///
/// - any `Send + Sync` value, retrieved by the consumer with
///   [`CapabilityHandle::downcast_ref`] or [`CapabilityHandle::downcast_arc`];
/// - a JSON function built with [`CapabilityHandle::callable`] and invoked
///   through [`CapabilityHandle::call`].
///
/// Cloning a handle is cheap and preserves identity, so a fallback is
/// indistinguishable from a primary implementation at the call site.
///
/// # Examples
///
/// ```
/// use corebank_backbone::service_registry::domain::CapabilityHandle;
/// use serde_json::json;
///
/// let balance = CapabilityHandle::callable(|input| {
///     Ok(json!({"account": input["account"], "balance": 100}))
/// });
/// let reply = balance.call(json!({"account": "acc-1"})).expect("callable");
/// assert_eq!(reply["balance"], 100);
/// ```
#[derive(Clone)]
pub struct CapabilityHandle {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CapabilityHandle {
    /// Wraps an arbitrary implementation value.
    #[must_use]
    pub fn new<T>(implementation: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::from_arc(Arc::new(implementation))
    }

    /// Wraps an already shared implementation without copying it.
    #[must_use]
    pub fn from_arc<T>(implementation: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            inner: implementation,
            type_name: type_name::<T>(),
        }
    }

    /// Wraps a function following the JSON calling convention.
    #[must_use]
    pub fn callable<F>(function: F) -> Self
    where
        F: Fn(Value) -> Result<Value, CapabilityCallError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(CallableCapability(Box::new(function))),
            type_name: type_name::<F>(),
        }
    }

    /// Invokes a callable capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityCallError::NotCallable`] when the handle was not
    /// created with [`CapabilityHandle::callable`], or whatever error the
    /// capability itself reports.
    pub fn call(&self, input: Value) -> Result<Value, CapabilityCallError> {
        let callable = self
            .inner
            .downcast_ref::<CallableCapability>()
            .ok_or(CapabilityCallError::NotCallable {
                type_name: self.type_name,
            })?;
        (callable.0)(input)
    }

    /// Returns whether the handle follows the JSON calling convention.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.inner.is::<CallableCapability>()
    }

    /// Borrows the implementation as `T` when the stored type matches.
    #[must_use]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a shared pointer to the implementation as `T`.
    #[must_use]
    pub fn downcast_arc<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Returns whether both handles point at the same implementation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }

    /// Returns the Rust type name of the stored implementation.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for CapabilityHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CapabilityHandle")
            .field("type_name", &self.type_name)
            .field("callable", &self.is_callable())
            .finish()
    }
}
