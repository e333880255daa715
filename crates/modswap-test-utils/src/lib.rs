//! Testing utilities for the modswap workspace
//!
//! Shared fixtures and helpers: the canonical subject/dependency module
//! graph used across crates, and logging init for tests.

#![allow(missing_docs)]

use modswap_loader::{BindingMap, ModuleRegistry, ModuleValue};
use std::sync::Arc;

pub const SUBJECT: &str = "/app/subject";
pub const DEPENDENCY1: &str = "/app/deps/dependency1";
pub const DEPENDENCY2: &str = "/app/deps/dependency2";
pub const CONFIG: &str = "config";

/// The canonical fixture graph.
///
/// - `/app/deps/dependency1`: function returning 1
/// - `/app/deps/dependency2`: function returning 2
/// - `config` (bare name): record `{a: 1, b: 2}`
/// - `/app/subject`: re-exports all three under named bindings
pub fn fixture_registry() -> Arc<ModuleRegistry> {
    let registry = Arc::new(ModuleRegistry::new());

    registry
        .register_value(DEPENDENCY1, fn_returning(ModuleValue::data(1)))
        .unwrap();
    registry
        .register_value(DEPENDENCY2, fn_returning(ModuleValue::data(2)))
        .unwrap();
    registry
        .register_value(
            CONFIG,
            ModuleValue::record(
                BindingMap::new()
                    .bind("a", ModuleValue::data(1))
                    .bind("b", ModuleValue::data(2)),
            ),
        )
        .unwrap();
    registry
        .register(SUBJECT, |linker| {
            let dependency1 = linker.import("./deps/dependency1")?;
            let dependency2 = linker.import("./deps/dependency2")?;
            let config = linker.import("config")?;
            Ok(ModuleValue::record(
                BindingMap::new()
                    .bind("dependency1", dependency1)
                    .bind("dependency2", dependency2)
                    .bind("config", config),
            ))
        })
        .unwrap();

    registry
}

/// A function value ignoring its arguments and returning `value`.
pub fn fn_returning(value: ModuleValue) -> ModuleValue {
    ModuleValue::function(move |_| value.clone())
}

/// Call the named binding of a materialized subject with no arguments.
pub fn call_binding(subject: &ModuleValue, name: &str) -> ModuleValue {
    subject
        .get(name)
        .unwrap_or_else(|| panic!("no binding named '{name}'"))
        .call(&[])
        .unwrap()
}

/// Initialize tracing for tests; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
