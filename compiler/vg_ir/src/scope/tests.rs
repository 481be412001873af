use super::*;
use std::cell::Cell;

fn int() -> Type {
    Type::primitive("int")
}

fn var(name: &str) -> Variable {
    Variable::new(name, Value::new(int(), "0"))
}

#[test]
fn test_append_order_is_kept() {
    let mut scope = Scope::new(2);
    scope.comment("first");
    scope.local(&var("a"));
    scope.call("work", vec![]);
    scope.ret(None);

    let kinds: Vec<&'static str> = scope
        .stmts()
        .iter()
        .map(|stmt| match stmt {
            Stmt::Comment(_) => "comment",
            Stmt::LocalVariable { .. } => "local",
            Stmt::Call { .. } => "call",
            Stmt::Return(_) => "return",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["comment", "local", "call", "return"]);
}

#[test]
fn test_bodies_are_one_level_deeper() {
    let mut scope = Scope::new(1);
    scope.if_block(Value::condition(Type::primitive("boolean"), "true"), |body| {
        assert_eq!(body.tabs(), 2);
        body.while_loop(Value::condition(Type::primitive("boolean"), "x"), |inner| {
            assert_eq!(inner.tabs(), 3);
            inner.call("step", vec![]);
        });
    });

    let Stmt::If { body, .. } = &scope.stmts()[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(body.tabs(), 2);
    assert_eq!(body.stmts().len(), 1);
}

#[test]
fn test_duplicate_declaration_is_skipped() {
    let mut scope = Scope::new(0);
    scope.local(&var("a"));
    scope.local(&Variable::new("a", Value::new(int(), "1")));
    scope.instance_variable(Visibility::Private, &var("a"), None, Modifiers::empty());

    assert_eq!(scope.stmts().len(), 1);
    assert!(scope.declares("a"));
}

#[test]
fn test_try_name() {
    let mut scope = Scope::new(0);
    assert_eq!(scope.try_name("mat"), "mat");

    scope.local(&var("mat"));
    assert_eq!(scope.try_name("mat"), "mat1");

    scope.local(&var("mat1"));
    assert_eq!(scope.try_name("mat"), "mat2");
}

#[test]
fn test_before_returning_runs_before_each_return() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);

    let mut scope = Scope::new(2);
    scope.before_returning(move |s| {
        seen.set(seen.get() + 1);
        s.call("release", vec![]);
    });
    scope.ret(Some(Value::raw("a")));
    scope.ret(None);

    assert_eq!(calls.get(), 2);
    assert_eq!(scope.stmts().len(), 4);
    assert!(matches!(&scope.stmts()[0], Stmt::Call { method, .. } if method == "release"));
    assert!(matches!(&scope.stmts()[1], Stmt::Return(Some(_))));
}

#[test]
fn test_separate_collapses() {
    let mut scope = Scope::new(0);
    scope.separate();
    assert!(scope.is_empty());

    scope.comment("a");
    scope.separate();
    scope.separate();
    assert_eq!(scope.stmts().len(), 2);
}

#[test]
fn test_groups_are_separated() {
    let mut scope = Scope::new(0);
    scope.group(|s| s.comment("one"));
    scope.group(|s| s.comment("two"));

    assert_eq!(scope.stmts().len(), 3);
    assert!(matches!(scope.stmts()[1], Stmt::Blank));
}

#[test]
fn test_for_loop_passes_variable() {
    let mut scope = Scope::new(0);
    let i = Variable::typed(int(), "i");
    scope.for_loop(&i, Value::new(int(), "0"), Value::new(int(), "10"), None, |body, i| {
        body.call("use", vec![i.as_value().clone()]);
    });

    let Stmt::For { body, variable, .. } = &scope.stmts()[0] else {
        panic!("expected a for statement");
    };
    assert_eq!(variable.name(), "i");
    let Stmt::Call { args, .. } = &body.stmts()[0] else {
        panic!("expected a call");
    };
    assert_eq!(args[0].text(), Some("i"));
}

#[test]
fn test_nest_at_keeps_override() {
    let mut inner = Scope::new(5);
    inner.comment("x");
    let mut outer = Scope::new(0);
    outer.nest_at(inner, 1);

    assert!(matches!(&outer.stmts()[0], Stmt::Nested { indent: Some(1), .. }));
    assert!(outer.stmts()[0].is_declaration_block());
}
