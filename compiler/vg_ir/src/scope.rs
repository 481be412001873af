//! Append-only statement containers.
//!
//! A [`Scope`] is an ordered list of [`Stmt`]s at a tab level. Bodies of
//! loops, conditionals, methods and classes are nested scopes one level
//! deeper, built through closures:
//!
//! ```text
//! scope.if_block(condition, |body| {
//!     body.call("doSomething", vec![]);
//! });
//! ```
//!
//! Nothing is rendered here; `vg_language` turns a scope into text for a
//! concrete backend. Statements can only be appended, never removed.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::{ClassSignature, MethodSignature, Modifiers, Parameter, Type, Value, Variable, Visibility};

/// A single statement.
#[derive(Clone, Debug)]
pub enum Stmt {
    InstanceVariable {
        visibility: Visibility,
        variable: Variable,
        label: Option<String>,
        modifiers: Modifiers,
    },
    LocalVariable {
        variable: Variable,
        is_final: bool,
    },
    Assign {
        variable: Variable,
        value: Value,
    },
    ArraySet {
        variable: Variable,
        index: Value,
        value: Value,
    },
    InstanceAssign {
        variable: Variable,
        value: Value,
    },
    StaticCall {
        class: Type,
        method: String,
        args: Vec<Value>,
    },
    MethodCall {
        callee: Value,
        method: String,
        args: Vec<Value>,
    },
    Call {
        method: String,
        args: Vec<Value>,
    },
    Return(Option<Value>),
    If {
        condition: Value,
        body: Scope,
    },
    While {
        condition: Value,
        body: Scope,
    },
    /// `for variable = start; variable < max; variable += step`
    For {
        variable: Variable,
        start: Value,
        max: Value,
        step: Option<Value>,
        body: Scope,
    },
    Foreach {
        variable: Variable,
        iterable: Value,
        body: Scope,
    },
    Method {
        signature: MethodSignature,
        body: Scope,
    },
    Constructor {
        visibility: Visibility,
        class_name: String,
        parameters: Vec<Parameter>,
        body: Scope,
    },
    Class {
        signature: ClassSignature,
        body: Scope,
    },
    Enum {
        name: String,
        values: Vec<String>,
    },
    Comment(String),
    /// Text emitted verbatim at the scope's indentation (placeholder markers).
    Raw(String),
    /// An empty separating line.
    Blank,
    /// Another scope spliced in; `indent` overrides its own tab level.
    Nested {
        scope: Scope,
        indent: Option<usize>,
    },
}

impl Stmt {
    /// Declarations that get a blank line in front of them.
    pub fn is_declaration_block(&self) -> bool {
        matches!(
            self,
            Stmt::Method { .. } | Stmt::Constructor { .. } | Stmt::Class { .. } | Stmt::Nested { .. }
        )
    }
}

type ReturnHook = Rc<dyn Fn(&mut Scope)>;

/// Ordered, append-only list of statements at a fixed tab level.
#[derive(Clone, Default)]
pub struct Scope {
    tabs: usize,
    stmts: Vec<Stmt>,
    declared: FxHashSet<String>,
    before_returning: Vec<ReturnHook>,
    groups: usize,
}

impl Scope {
    pub fn new(tabs: usize) -> Self {
        Scope {
            tabs,
            ..Scope::default()
        }
    }

    /// An empty scope one level deeper.
    pub fn child(&self) -> Scope {
        Scope::new(self.tabs + 1)
    }

    #[inline]
    pub fn tabs(&self) -> usize {
        self.tabs
    }

    #[inline]
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Whether `name` was declared in this scope.
    pub fn declares(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// `name` if unused in this scope, otherwise `name1`, `name2`, ...
    pub fn try_name(&self, name: &str) -> String {
        if !self.declared.contains(name) {
            return name.to_string();
        }

        let mut count = 1usize;
        loop {
            let candidate = format!("{name}{count}");
            if !self.declared.contains(&candidate) {
                return candidate;
            }
            count += 1;
        }
    }

    /// Append a statement as-is.
    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    fn declare(&mut self, variable: &Variable) -> bool {
        if self.declared.insert(variable.name().to_string()) {
            return true;
        }

        tracing::warn!(
            name = variable.name(),
            "variable declared twice in the same scope, keeping the first declaration"
        );
        false
    }

    pub fn instance_variable(
        &mut self,
        visibility: Visibility,
        variable: &Variable,
        label: Option<&str>,
        modifiers: Modifiers,
    ) {
        if self.declare(variable) {
            self.push(Stmt::InstanceVariable {
                visibility,
                variable: variable.clone(),
                label: label.map(str::to_string),
                modifiers,
            });
        }
    }

    pub fn local(&mut self, variable: &Variable) {
        if self.declare(variable) {
            self.push(Stmt::LocalVariable {
                variable: variable.clone(),
                is_final: false,
            });
        }
    }

    pub fn local_final(&mut self, variable: &Variable) {
        if self.declare(variable) {
            self.push(Stmt::LocalVariable {
                variable: variable.clone(),
                is_final: true,
            });
        }
    }

    pub fn assign(&mut self, variable: &Variable, value: Value) {
        self.push(Stmt::Assign {
            variable: variable.clone(),
            value,
        });
    }

    pub fn array_set(&mut self, variable: &Variable, index: Value, value: Value) {
        self.push(Stmt::ArraySet {
            variable: variable.clone(),
            index,
            value,
        });
    }

    pub fn instance_assign(&mut self, variable: &Variable, value: Value) {
        self.push(Stmt::InstanceAssign {
            variable: variable.clone(),
            value,
        });
    }

    /// `method(args)`
    pub fn call(&mut self, method: impl Into<String>, args: Vec<Value>) {
        self.push(Stmt::Call {
            method: method.into(),
            args,
        });
    }

    /// `Class.method(args)`
    pub fn static_call(&mut self, class: &Type, method: impl Into<String>, args: Vec<Value>) {
        self.push(Stmt::StaticCall {
            class: class.clone(),
            method: method.into(),
            args,
        });
    }

    /// `callee.method(args)`
    pub fn method_call(&mut self, callee: &Value, method: impl Into<String>, args: Vec<Value>) {
        self.push(Stmt::MethodCall {
            callee: callee.clone(),
            method: method.into(),
            args,
        });
    }

    /// Register a hook that runs right before every `return` appended to
    /// this scope from now on.
    pub fn before_returning(&mut self, hook: impl Fn(&mut Scope) + 'static) {
        self.before_returning.push(Rc::new(hook));
    }

    pub fn ret(&mut self, value: Option<Value>) {
        let hooks = self.before_returning.clone();
        for hook in &hooks {
            hook(self);
        }
        self.push(Stmt::Return(value));
    }

    pub fn if_block(&mut self, condition: Value, build: impl FnOnce(&mut Scope)) {
        let mut body = self.child();
        build(&mut body);
        self.push(Stmt::If { condition, body });
    }

    pub fn while_loop(&mut self, condition: Value, build: impl FnOnce(&mut Scope)) {
        let mut body = self.child();
        build(&mut body);
        self.push(Stmt::While { condition, body });
    }

    /// Counting loop; `build` receives the body and the loop variable.
    pub fn for_loop(
        &mut self,
        variable: &Variable,
        start: Value,
        max: Value,
        step: Option<Value>,
        build: impl FnOnce(&mut Scope, &Variable),
    ) {
        let mut body = self.child();
        build(&mut body, variable);
        self.push(Stmt::For {
            variable: variable.clone(),
            start,
            max,
            step,
            body,
        });
    }

    pub fn foreach(&mut self, variable: &Variable, iterable: Value, build: impl FnOnce(&mut Scope, &Variable)) {
        let mut body = self.child();
        build(&mut body, variable);
        self.push(Stmt::Foreach {
            variable: variable.clone(),
            iterable,
            body,
        });
    }

    pub fn method(&mut self, signature: MethodSignature, build: impl FnOnce(&mut Scope)) {
        let mut body = self.child();
        build(&mut body);
        self.push(Stmt::Method { signature, body });
    }

    /// Method whose body was built elsewhere.
    pub fn method_with_body(&mut self, signature: MethodSignature, body: Scope) {
        self.push(Stmt::Method { signature, body });
    }

    pub fn constructor(
        &mut self,
        visibility: Visibility,
        class_name: impl Into<String>,
        parameters: Vec<Parameter>,
        build: impl FnOnce(&mut Scope),
    ) {
        let mut body = self.child();
        build(&mut body);
        self.push(Stmt::Constructor {
            visibility,
            class_name: class_name.into(),
            parameters,
            body,
        });
    }

    pub fn class(&mut self, signature: ClassSignature, build: impl FnOnce(&mut Scope)) {
        let mut body = self.child();
        build(&mut body);
        self.push(Stmt::Class { signature, body });
    }

    pub fn class_with_body(&mut self, signature: ClassSignature, body: Scope) {
        self.push(Stmt::Class { signature, body });
    }

    pub fn enum_decl(&mut self, name: impl Into<String>, values: &[&str]) {
        self.push(Stmt::Enum {
            name: name.into(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        });
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.push(Stmt::Comment(text.into()));
    }

    /// Emit `text` verbatim at this scope's indentation.
    pub fn write(&mut self, text: impl Into<String>) {
        self.push(Stmt::Raw(text.into()));
    }

    /// Blank separator line; consecutive separators collapse into one.
    pub fn separate(&mut self) {
        if !matches!(self.stmts.last(), None | Some(Stmt::Blank)) {
            self.push(Stmt::Blank);
        }
    }

    /// Splice another scope in at its own tab level.
    pub fn nest(&mut self, scope: Scope) {
        self.push(Stmt::Nested { scope, indent: None });
    }

    /// Splice another scope in, re-indented to `indent` tabs.
    pub fn nest_at(&mut self, scope: Scope, indent: usize) {
        self.push(Stmt::Nested {
            scope,
            indent: Some(indent),
        });
    }

    /// Statements built in `build` are separated from the previous group by
    /// a blank line. The first group gets no separator.
    pub fn group(&mut self, build: impl FnOnce(&mut Scope)) {
        if self.groups > 0 {
            self.separate();
        }
        self.groups += 1;
        build(self);
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("tabs", &self.tabs)
            .field("stmts", &self.stmts)
            .field("before_returning", &self.before_returning.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
