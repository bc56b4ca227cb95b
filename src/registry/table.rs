//! Process-wide table of interface registries, one per api type.

use super::InterfaceRegistry;
use crate::api::Api;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::info;

type RegistryTable = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

static REGISTRIES: OnceLock<RegistryTable> = OnceLock::new();

/// The shared registry for `A`, running `A::interfaces` on first use
pub fn registry_for<A: Api>() -> Arc<InterfaceRegistry<A>> {
    let table = REGISTRIES.get_or_init(Default::default);
    let type_id = TypeId::of::<A>();

    if let Some(existing) = table.read().get(&type_id) {
        if let Ok(registry) = Arc::clone(existing).downcast::<InterfaceRegistry<A>>() {
            return registry;
        }
    }

    // Built without holding the lock: declarations may resolve other
    // api types' registries.
    let mut registry = InterfaceRegistry::<A>::new();
    A::interfaces(&mut registry);
    registry.finish();
    let built = Arc::new(registry);

    let mut table = table.write();
    let entry = table
        .entry(type_id)
        .or_insert_with(|| Arc::clone(&built) as Arc<dyn Any + Send + Sync>);

    match Arc::clone(entry).downcast::<InterfaceRegistry<A>>() {
        Ok(registry) => {
            if Arc::ptr_eq(&registry, &built) {
                info!(
                    api = std::any::type_name::<A>(),
                    interfaces = registry.len(),
                    "Interface registry built"
                );
            }
            registry
        }
        Err(_) => built,
    }
}
