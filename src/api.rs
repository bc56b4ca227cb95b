//! The api type contract.

use crate::registry::InterfaceRegistry;

/// A type that owns a set of interfaces.
///
/// `interfaces` declares them once per process; every
/// [`crate::Dispatcher`] of the type then shares the resulting registry.
pub trait Api: Sized + 'static {
    fn interfaces(registry: &mut InterfaceRegistry<Self>);
}
