use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use vg_ir::{ImportScope, Type, Value};

use super::*;
use crate::{Resolvable, ResolveCx};

fn resolve(registry: &PlaceholderRegistry, text: &str) -> (Resolution, ImportScope) {
    let mut imports = ImportScope::new();
    let resolution = PlaceholderResolver::new(registry).resolve(text, &mut imports);
    (resolution, imports)
}

fn rect() -> Type {
    Type::new("Rect", "org.opencv.core")
}

#[test]
fn test_dependent_marker_resolves_through_its_dependency() {
    let mut registry = PlaceholderRegistry::new();
    let five = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some("5".to_string()));
    let dependency = five.clone();
    let prefixed = registry.placeholder(move |cx: &mut ResolveCx<'_>| Some(format!("x{}", dependency.resolve(cx)?)));

    let text = format!("val = {}, val2 = {}", prefixed.marker(), five.marker());
    let (resolution, _) = resolve(&registry, &text);

    assert_eq!(resolution.text, "val = x5, val2 = 5");
    assert!(resolution.is_complete());
    assert!(resolution.cycles.is_empty());
}

#[test]
fn test_value_imports_registered_once() {
    let mut registry = PlaceholderRegistry::new();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let rect_value = registry.placeholder(move |_cx: &mut ResolveCx<'_>| {
        counter.set(counter.get() + 1);
        Some(Value::new(rect(), "boundingRect"))
    });

    let marker = rect_value.marker();
    let text = format!("{marker} {marker} {marker}");
    let (resolution, imports) = resolve(&registry, &text);

    assert_eq!(resolution.text, "boundingRect boundingRect boundingRect");
    assert_eq!(imports.types(), &[rect()]);
    // Never memoized.
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_unknown_id_is_left_in_place() {
    let registry = PlaceholderRegistry::new();
    let text = "before <@vg#99#@> after";

    let mut imports = ImportScope::new();
    let mut cx = ResolveCx::new(&registry, &mut imports);
    let sweep = PlaceholderResolver::new(&registry).sweep(text, &mut cx, Tier::Normal);
    assert_eq!(
        sweep,
        Sweep {
            text: text.to_string(),
            changed: false
        }
    );

    let (resolution, _) = resolve(&registry, text);
    assert_eq!(resolution.text, text);
    assert_eq!(resolution.unresolved, vec![PlaceholderId::new(99)]);
}

#[test]
fn test_from_resolvable_flattens_late_placeholder() {
    let mut registry = PlaceholderRegistry::new();
    let slot: Rc<RefCell<Option<Resolvable<String>>>> = Rc::new(RefCell::new(None));

    let supplier = Rc::clone(&slot);
    let chained = registry.from_resolvable(move || supplier.borrow().clone());
    assert!(!chained.is_now());

    let inner = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some("late".to_string()));
    *slot.borrow_mut() = Some(inner.into());

    let (resolution, _) = resolve(&registry, &format!("[{}]", chained.to_text()));
    assert_eq!(resolution.text, "[late]");
}

#[test]
fn test_from_resolvable_returns_available_inner() {
    let mut registry = PlaceholderRegistry::new();
    let inner: Resolvable<String> = registry
        .placeholder(|_cx: &mut ResolveCx<'_>| Some("inner".to_string()))
        .into();
    let expected = inner.placeholder_id();

    let supplied = inner.clone();
    let chained = registry.from_resolvable(move || Some(supplied.clone()));
    assert_eq!(chained.placeholder_id(), expected);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_from_value_probes_again_until_available() {
    let mut registry = PlaceholderRegistry::new();
    let slot: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

    let probe = Rc::clone(&slot);
    let value = registry.from_value(move || probe.borrow().clone());
    let text = format!("mat = {}", value.to_text());

    let (resolution, _) = resolve(&registry, &text);
    assert_eq!(resolution.text, text);
    assert_eq!(resolution.unresolved.len(), 1);

    *slot.borrow_mut() = Some("hsvMat".to_string());
    let (resolution, _) = resolve(&registry, &text);
    assert_eq!(resolution.text, "mat = hsvMat");

    let known = registry.from_value(|| Some(3));
    assert_eq!(known.now(), Some(&3));
    assert_eq!(known.to_text(), "3");
}

#[test]
fn test_two_placeholder_cycle_terminates() {
    let mut registry = PlaceholderRegistry::new();
    let a = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(PlaceholderId::new(1).marker()));
    let b = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(PlaceholderId::new(0).marker()));
    assert_eq!((a.id().raw(), b.id().raw()), (0, 1));

    let text = format!("{} {}", a.marker(), b.marker());
    let (resolution, _) = resolve(&registry, &text);

    assert_eq!(resolution.text, text);
    assert_eq!(resolution.unresolved, vec![a.id(), b.id()]);
    // One detection per occurrence.
    assert_eq!(resolution.cycles.len(), 2);
    assert_eq!(resolution.cycles[0].path(), "0 -> 1 -> 0");
    assert_eq!(resolution.cycles[1].path(), "1 -> 0 -> 1");
}

#[test]
fn test_cycle_registers_no_imports() {
    let mut registry = PlaceholderRegistry::new();
    let outer = registry.placeholder(|_cx: &mut ResolveCx<'_>| {
        Some(Value::new(rect(), format!("use({})", PlaceholderId::new(1).marker())))
    });
    let inner = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(PlaceholderId::new(0).marker()));
    assert_eq!((outer.id().raw(), inner.id().raw()), (0, 1));

    let (resolution, imports) = resolve(&registry, &outer.marker());

    assert_eq!(resolution.text, outer.marker());
    assert_eq!(resolution.cycles.len(), 1);
    assert!(!imports.contains(&rect()));
    assert!(imports.is_empty());
}

#[test]
fn test_unavailable_nested_value_registers_no_imports() {
    let mut registry = PlaceholderRegistry::new();
    let never = registry.placeholder(|_cx: &mut ResolveCx<'_>| None::<String>);
    let never = never.marker();
    let dependency: Resolvable<String> = registry
        .placeholder(move |_cx: &mut ResolveCx<'_>| None::<String>)
        .into();
    let wrapped = registry.placeholder(move |cx: &mut ResolveCx<'_>| {
        cx.imports_mut().import_type(&rect());
        dependency.resolve(cx)
    });

    let (resolution, imports) = resolve(&registry, &format!("{never} {}", wrapped.marker()));
    assert_eq!(resolution.unresolved.len(), 2);
    assert!(imports.is_empty());
}

#[test]
fn test_typed_self_dependency_is_a_cycle() {
    let mut registry = PlaceholderRegistry::new();
    let slot: Rc<RefCell<Option<Resolvable<String>>>> = Rc::new(RefCell::new(None));

    let this = Rc::clone(&slot);
    let looping: Resolvable<String> = registry
        .placeholder(move |cx: &mut ResolveCx<'_>| {
            let inner = this.borrow().clone()?;
            inner.resolve(cx)
        })
        .into();
    *slot.borrow_mut() = Some(looping.clone());

    let (resolution, _) = resolve(&registry, &looping.to_text());
    assert_eq!(resolution.unresolved, vec![PlaceholderId::new(0)]);
    assert_eq!(resolution.cycles.len(), 1);

    // Break the reference cycle between the closure and the slot.
    slot.borrow_mut().take();
}

#[test]
fn test_nested_markers_expand_in_one_pass() {
    let mut registry = PlaceholderRegistry::new();
    let inner = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(Value::new(rect(), "r")));
    let inner_marker = inner.marker();
    let outer = registry.placeholder(move |_cx: &mut ResolveCx<'_>| Some(format!("draw({inner_marker})")));

    let (resolution, imports) = resolve(&registry, &outer.marker());
    assert_eq!(resolution.text, "draw(r)");
    assert!(imports.contains(&rect()));
}

#[test]
fn test_unavailable_value_is_reported() {
    let mut registry = PlaceholderRegistry::new();
    let never = registry.placeholder(|_cx: &mut ResolveCx<'_>| None::<String>);

    let (resolution, _) = resolve(&registry, &format!("x = {};", never.marker()));
    assert_eq!(resolution.text, format!("x = {};", never.marker()));
    assert_eq!(resolution.unresolved, vec![never.id()]);
    assert!(resolution.cycles.is_empty());
}

#[test]
fn test_deferred_tier_sees_normal_output() {
    let mut registry = PlaceholderRegistry::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&order);
    let imports_block = registry.placeholder_last(move |cx: &mut ResolveCx<'_>| {
        log.borrow_mut().push("imports");
        let names: Vec<&str> = cx.imports().types().iter().map(Type::name).collect();
        Some(names.join(","))
    });

    let log = Rc::clone(&order);
    let value = registry.placeholder(move |_cx: &mut ResolveCx<'_>| {
        log.borrow_mut().push("value");
        Some(Value::new(rect(), "rect"))
    });

    let text = format!("{}\n{}", imports_block.marker(), value.marker());
    let (resolution, _) = resolve(&registry, &text);

    assert_eq!(resolution.text, "Rect\nrect");
    assert_eq!(*order.borrow(), vec!["value", "imports"]);
}

#[test]
fn test_normal_markers_from_deferred_tier_survive() {
    let mut registry = PlaceholderRegistry::new();
    let normal = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some("n"));
    let normal_marker = normal.marker();
    let last = registry.placeholder_last(move |_cx: &mut ResolveCx<'_>| Some(normal_marker.clone()));

    let (resolution, _) = resolve(&registry, &last.marker());
    assert_eq!(resolution.text, normal.marker());
    assert_eq!(resolution.unresolved, vec![normal.id()]);
}

#[test]
fn test_normal_dependent_of_deferred_waits_for_deferred_tier() {
    let mut registry = PlaceholderRegistry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    let import_count: Resolvable<usize> = registry
        .placeholder_last(move |cx: &mut ResolveCx<'_>| {
            log.borrow_mut().push(cx.imports().len());
            Some(cx.imports().len())
        })
        .into();
    let described = registry.dependent(&import_count, |count| format!("count={count}"));
    let value = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(Value::new(rect(), "r")));

    let text = format!(
        "{} {} {}",
        described.marker(),
        value.marker(),
        import_count.to_text()
    );
    let (resolution, imports) = resolve(&registry, &text);

    assert_eq!(resolution.text, "count=1 r 1");
    assert!(resolution.is_complete());
    assert_eq!(imports.types(), &[rect()]);
    // Every run of the deferred resolver saw the finished normal tier.
    assert_eq!(*seen.borrow(), vec![1, 1]);
}

#[test]
fn test_dependent_helpers() {
    let mut registry = PlaceholderRegistry::new();
    let width = registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(640));
    let width: Resolvable<i32> = width.into();
    let height = Resolvable::Now(480);

    let area = registry.dependent2(&width, &height, |w, h| w * h);
    let half = registry.dependent(&width, |w| Value::new(Type::primitive("int"), (w / 2).to_string()));

    let text = format!("{} {}", area.marker(), half.marker());
    let (resolution, _) = resolve(&registry, &text);
    assert_eq!(resolution.text, "307200 320");
}

#[test]
fn test_resolvable_now_never_embeds_marker() {
    let now: Resolvable<Value> = Resolvable::Now(Value::new(rect(), "rect"));
    assert_eq!(now.to_text(), "rect");
    assert_eq!(now.to_value().ty(), &rect());
    assert!(!crate::marker::contains_marker(&now.to_text()));
}

// === Property tests ===

mod proptest_resolution {
    use proptest::prelude::*;
    use vg_ir::{ImportScope, Type, Value};

    use crate::{PlaceholderId, PlaceholderRegistry, PlaceholderResolver, ResolveCx};

    /// Ids 0..=3 always resolve, 4 never does, 5 is unknown.
    fn registry() -> PlaceholderRegistry {
        let mut registry = PlaceholderRegistry::new();
        registry.placeholder(|_cx: &mut ResolveCx<'_>| Some("zero"));
        registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(format!("one({})", PlaceholderId::new(0).marker())));
        registry.placeholder(|_cx: &mut ResolveCx<'_>| Some(Value::new(Type::new("Mat", "org.opencv.core"), "mat")));
        registry.placeholder_last(|cx: &mut ResolveCx<'_>| Some(cx.imports().len()));
        registry.placeholder(|_cx: &mut ResolveCx<'_>| None::<String>);
        registry
    }

    fn piece() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z =;]{0,6}",
            (0u32..6).prop_map(|id| PlaceholderId::new(id).marker()),
        ]
    }

    proptest! {
        #[test]
        fn resolution_is_idempotent(pieces in proptest::collection::vec(piece(), 0..12)) {
            let registry = registry();
            let text = pieces.concat();

            let mut imports = ImportScope::new();
            let once = PlaceholderResolver::new(&registry).resolve(&text, &mut imports);
            let twice = PlaceholderResolver::new(&registry).resolve(&once.text, &mut imports);

            prop_assert_eq!(&once.text, &twice.text);
            prop_assert!(once.unresolved.iter().all(|id| id.raw() >= 4));
        }
    }
}
