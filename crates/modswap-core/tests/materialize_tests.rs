//! End-to-end materialize/reset scenarios over the fixture module graph.

use modswap_core::{Replacement, SubjectFactory, Substitution, SwapError};
use modswap_loader::{BindingMap, ModuleLoader, ModuleRegistry, ModuleValue};
use modswap_test_utils::{
    call_binding, fixture_registry, fn_returning, init_test_logging, CONFIG, DEPENDENCY1,
    DEPENDENCY2, SUBJECT,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn factory(
    registry: &Arc<ModuleRegistry>,
    defaults: impl modswap_core::IntoSubstitutions,
) -> SubjectFactory {
    SubjectFactory::new(
        registry.as_ref(),
        Arc::clone(registry) as Arc<dyn ModuleLoader>,
        SUBJECT,
        defaults,
    )
    .unwrap()
}

fn returning(registry: &Arc<ModuleRegistry>, reference: &str, value: i64) -> Substitution {
    Substitution::new(
        registry.as_ref(),
        reference,
        Replacement::value(fn_returning(ModuleValue::data(value))),
    )
    .unwrap()
}

#[test]
fn no_overrides_preserves_real_behavior() {
    init_test_logging();
    let registry = fixture_registry();
    let subject = factory(&registry, ()).materialize(()).unwrap();

    assert_eq!(call_binding(&subject, "dependency1"), ModuleValue::data(1));
    assert_eq!(call_binding(&subject, "dependency2"), ModuleValue::data(2));
}

#[test]
fn single_default_substitution() {
    let registry = fixture_registry();
    let default = returning(&registry, DEPENDENCY1, 3);
    let subject = factory(&registry, default).materialize(()).unwrap();

    assert_eq!(call_binding(&subject, "dependency1"), ModuleValue::data(3));
    assert_eq!(call_binding(&subject, "dependency2"), ModuleValue::data(2));
}

#[test]
fn sequence_of_default_substitutions() {
    let registry = fixture_registry();
    let defaults = vec![
        returning(&registry, DEPENDENCY1, 3),
        returning(&registry, DEPENDENCY2, 4),
    ];
    let subject = factory(&registry, defaults).materialize(()).unwrap();

    assert_eq!(call_binding(&subject, "dependency1"), ModuleValue::data(3));
    assert_eq!(call_binding(&subject, "dependency2"), ModuleValue::data(4));
}

#[test]
fn override_without_default_applies_exactly() {
    let registry = fixture_registry();
    let factory = factory(&registry, ());
    let subject = factory
        .materialize(returning(&registry, DEPENDENCY1, 9))
        .unwrap();

    assert_eq!(call_binding(&subject, "dependency1"), ModuleValue::data(9));
    assert_eq!(call_binding(&subject, "dependency2"), ModuleValue::data(2));
}

#[test]
fn override_wins_over_value_default() {
    let registry = fixture_registry();
    let factory = factory(&registry, returning(&registry, DEPENDENCY1, 3));
    let subject = factory
        .materialize(returning(&registry, DEPENDENCY1, 7))
        .unwrap();

    assert_eq!(call_binding(&subject, "dependency1"), ModuleValue::data(7));
}

#[test]
fn record_default_merges_with_record_override() {
    let registry = fixture_registry();
    let default = Substitution::new(
        registry.as_ref(),
        CONFIG,
        Replacement::record(
            BindingMap::new()
                .bind("a", ModuleValue::data(2))
                .bind("b", ModuleValue::data(5)),
        ),
    )
    .unwrap();
    let overriding = Substitution::new(
        registry.as_ref(),
        CONFIG,
        Replacement::record(BindingMap::new().bind("a", ModuleValue::data(0))),
    )
    .unwrap();

    let subject = factory(&registry, default).materialize(overriding).unwrap();
    let config = subject.get("config").unwrap();

    assert_eq!(config.get("a"), Some(&ModuleValue::data(0)));
    assert_eq!(config.get("b"), Some(&ModuleValue::data(5)));
}

#[test]
fn empty_record_override_contributes_nothing() {
    let registry = fixture_registry();
    let default = Substitution::new(
        registry.as_ref(),
        CONFIG,
        Replacement::record(BindingMap::new().bind("a", ModuleValue::data(2))),
    )
    .unwrap();
    let overriding = Substitution::new(
        registry.as_ref(),
        CONFIG,
        Replacement::record(BindingMap::new()),
    )
    .unwrap();

    let subject = factory(&registry, default).materialize(overriding).unwrap();
    let config = subject.get("config").unwrap();

    assert_eq!(config.get("a"), Some(&ModuleValue::data(2)));
}

#[test]
fn data_object_default_is_replaced_whole() {
    // a JSON object installed as a Value replacement is not a merge case
    let registry = fixture_registry();
    let default = Substitution::new(
        registry.as_ref(),
        CONFIG,
        Replacement::data(json!({"a": 2, "b": 5})),
    )
    .unwrap();
    let overriding = Substitution::new(
        registry.as_ref(),
        CONFIG,
        Replacement::data(json!({"a": 0})),
    )
    .unwrap();

    let subject = factory(&registry, default).materialize(overriding).unwrap();
    assert_eq!(
        subject.get("config"),
        Some(&ModuleValue::data(json!({"a": 0})))
    );
}

#[test]
fn materialize_is_idempotent() {
    let registry = fixture_registry();
    let factory = factory(&registry, returning(&registry, DEPENDENCY1, 3));
    let overriding = || returning(&registry, DEPENDENCY2, 4);

    let first = factory.materialize(overriding()).unwrap();
    let second = factory.materialize(overriding()).unwrap();

    assert_eq!(
        call_binding(&first, "dependency1"),
        call_binding(&second, "dependency1")
    );
    assert_eq!(
        call_binding(&first, "dependency2"),
        call_binding(&second, "dependency2")
    );
}

#[test]
fn consecutive_materializations_are_independent() {
    let registry = fixture_registry();
    let factory = factory(&registry, ());

    let first = factory
        .materialize(returning(&registry, DEPENDENCY1, 3))
        .unwrap();
    assert_eq!(call_binding(&first, "dependency1"), ModuleValue::data(3));

    let second = factory
        .materialize(returning(&registry, DEPENDENCY1, 5))
        .unwrap();
    assert_eq!(call_binding(&second, "dependency1"), ModuleValue::data(5));
}

#[test]
fn reset_clears_all_installed_substitutions() {
    let registry = fixture_registry();
    let factory = factory(&registry, ());

    let mocked = factory
        .materialize(vec![
            returning(&registry, DEPENDENCY1, 3),
            returning(&registry, DEPENDENCY2, 4),
        ])
        .unwrap();
    assert_eq!(call_binding(&mocked, "dependency1"), ModuleValue::data(3));
    assert_eq!(call_binding(&mocked, "dependency2"), ModuleValue::data(4));

    factory.reset();

    let real = factory.materialize(()).unwrap();
    assert_eq!(call_binding(&real, "dependency1"), ModuleValue::data(1));
    assert_eq!(call_binding(&real, "dependency2"), ModuleValue::data(2));
}

#[test]
fn duplicate_override_targets_are_rejected() {
    let registry = fixture_registry();
    let factory = factory(&registry, ());
    let result = factory.materialize(vec![
        returning(&registry, DEPENDENCY1, 3),
        returning(&registry, DEPENDENCY1, 4),
    ]);
    assert!(matches!(result, Err(SwapError::DuplicateTarget { .. })));
}

#[test]
fn substitution_of_unregistered_module_fails_construction() {
    let registry = fixture_registry();
    let result = Substitution::new(registry.as_ref(), "/app/deps/missing", Replacement::data(1));
    assert!(matches!(
        result,
        Err(modswap_resolve::ResolveError::NotFound { .. })
    ));
}

#[test]
fn replacement_data_type_matrix() {
    // sequence, opaque constructible, function, record, primitive -- as
    // defaults, as overrides with no defaults, and as overrides on top of
    // differing defaults
    struct Widget {
        a: i64,
    }

    let build_registry = || {
        let registry = Arc::new(ModuleRegistry::new());
        registry
            .register_value("/deps/array", ModuleValue::data(json!([9])))
            .unwrap();
        registry
            .register_value("/deps/widget", ModuleValue::opaque(Widget { a: 0 }))
            .unwrap();
        registry
            .register_value("/deps/function", fn_returning(ModuleValue::data(0)))
            .unwrap();
        registry
            .register_value(
                "/deps/object",
                ModuleValue::record(BindingMap::new().bind("a", ModuleValue::data(0))),
            )
            .unwrap();
        registry
            .register_value("/deps/value", ModuleValue::data(0))
            .unwrap();
        registry
            .register("/subject", |linker| {
                Ok(ModuleValue::record(
                    BindingMap::new()
                        .bind("array", linker.import("/deps/array")?)
                        .bind("widget", linker.import("/deps/widget")?)
                        .bind("function", linker.import("/deps/function")?)
                        .bind("object", linker.import("/deps/object")?)
                        .bind("value", linker.import("/deps/value")?),
                ))
            })
            .unwrap();
        registry
    };

    let substitutions = |registry: &Arc<ModuleRegistry>| {
        vec![
            Substitution::new(
                registry.as_ref(),
                "/deps/array",
                Replacement::data(json!([1, 2, 3, 4, 5])),
            )
            .unwrap(),
            Substitution::new(
                registry.as_ref(),
                "/deps/widget",
                Replacement::value(ModuleValue::opaque(Widget { a: 2 })),
            )
            .unwrap(),
            Substitution::new(
                registry.as_ref(),
                "/deps/function",
                Replacement::function(|_| ModuleValue::data(2)),
            )
            .unwrap(),
            Substitution::new(
                registry.as_ref(),
                "/deps/object",
                Replacement::record(BindingMap::new().bind("a", ModuleValue::data(2))),
            )
            .unwrap(),
            Substitution::new(registry.as_ref(), "/deps/value", Replacement::data(2)).unwrap(),
        ]
    };

    let validate = |subject: &ModuleValue| {
        assert_eq!(
            subject.get("array"),
            Some(&ModuleValue::data(json!([1, 2, 3, 4, 5])))
        );
        assert_eq!(
            subject
                .get("widget")
                .unwrap()
                .downcast_opaque::<Widget>()
                .unwrap()
                .a,
            2
        );
        assert_eq!(call_binding(subject, "function"), ModuleValue::data(2));
        assert_eq!(
            subject.get("object").unwrap().get("a"),
            Some(&ModuleValue::data(2))
        );
        assert_eq!(subject.get("value"), Some(&ModuleValue::data(2)));
    };

    // as defaults
    let registry = build_registry();
    let with_defaults = SubjectFactory::new(
        registry.as_ref(),
        Arc::clone(&registry) as Arc<dyn ModuleLoader>,
        "/subject",
        substitutions(&registry),
    )
    .unwrap();
    validate(&with_defaults.materialize(()).unwrap());

    // as overrides with no defaults
    let registry = build_registry();
    let no_defaults = SubjectFactory::new(
        registry.as_ref(),
        Arc::clone(&registry) as Arc<dyn ModuleLoader>,
        "/subject",
        (),
    )
    .unwrap();
    validate(&no_defaults.materialize(substitutions(&registry)).unwrap());

    // as overrides on top of differing defaults
    let registry = build_registry();
    let differing_defaults = vec![
        Substitution::new(registry.as_ref(), "/deps/array", Replacement::data(json!([])))
            .unwrap(),
        Substitution::new(
            registry.as_ref(),
            "/deps/function",
            Replacement::function(|_| ModuleValue::null()),
        )
        .unwrap(),
        Substitution::new(
            registry.as_ref(),
            "/deps/object",
            Replacement::record(BindingMap::new().bind("a", ModuleValue::data(0))),
        )
        .unwrap(),
        Substitution::new(registry.as_ref(), "/deps/value", Replacement::data(0)).unwrap(),
    ];
    let overridden = SubjectFactory::new(
        registry.as_ref(),
        Arc::clone(&registry) as Arc<dyn ModuleLoader>,
        "/subject",
        differing_defaults,
    )
    .unwrap();
    validate(&overridden.materialize(substitutions(&registry)).unwrap());
}
