//! Scope rendering.
//!
//! Statements render in append order, one per line, indented with tab
//! characters. Block bodies render one level deeper than their header.
//! Declarations with bodies (methods, constructors, classes) and nested
//! scopes get a blank line in front of them unless the output so far is
//! empty or already ends with one.
//!
//! Rendering is a pure function of the statements and the backend; the only
//! side effect is registering used types on the import sink.

use vg_ir::{ImportScope, Scope, Stmt, Type, Value};

use crate::{Declaration, Language, LanguageError};

/// Renders scopes for one backend, collecting imports as it goes.
pub struct Renderer<'a> {
    lang: &'a dyn Language,
    imports: &'a mut ImportScope,
    previz: bool,
}

impl<'a> Renderer<'a> {
    /// `previz` keeps instance variable labels; they are dropped otherwise.
    pub fn new(lang: &'a dyn Language, imports: &'a mut ImportScope, previz: bool) -> Self {
        Renderer { lang, imports, previz }
    }

    /// Render `scope` starting at its own tab level.
    pub fn render(&mut self, scope: &Scope) -> Result<String, LanguageError> {
        self.render_at(scope, scope.tabs())
    }

    /// Render `scope` starting at `indent` tabs, whatever its own level.
    pub fn render_at(&mut self, scope: &Scope, indent: usize) -> Result<String, LanguageError> {
        let mut out = String::new();
        for stmt in scope.stmts() {
            self.stmt(&mut out, stmt, indent)?;
        }
        Ok(out)
    }

    fn import(&mut self, value: &Value) {
        self.imports.import_value(value);
    }

    fn import_type(&mut self, ty: &Type) {
        self.imports.import_type(ty);
    }

    fn import_all(&mut self, values: &[Value]) {
        self.imports.import_values(values);
    }

    fn stmt(&mut self, out: &mut String, stmt: &Stmt, indent: usize) -> Result<(), LanguageError> {
        let lang = self.lang;

        if stmt.is_declaration_block() {
            blank_line_before(out);
        }

        match stmt {
            Stmt::InstanceVariable {
                visibility,
                variable,
                label,
                modifiers,
            } => {
                self.import(variable.as_value());
                let label = if self.previz { label.as_deref() } else { None };
                let decl = lang.instance_variable(*visibility, variable, label, *modifiers);
                self.declaration(out, &decl, indent);
            }
            Stmt::LocalVariable { variable, is_final } => {
                self.import(variable.as_value());
                push_lines(out, indent, &lang.local_variable(variable, *is_final));
            }
            Stmt::Assign { variable, value } => {
                self.import(value);
                push_lines(out, indent, &lang.assignment(variable, value));
            }
            Stmt::ArraySet { variable, index, value } => {
                self.import(index);
                self.import(value);
                push_lines(out, indent, &lang.array_assignment(variable, index, value));
            }
            Stmt::InstanceAssign { variable, value } => {
                self.import(value);
                push_lines(out, indent, &lang.instance_assignment(variable, value));
            }
            Stmt::StaticCall { class, method, args } => {
                self.import_type(class);
                self.import_all(args);
                push_lines(out, indent, &lang.static_call(class, method, args));
            }
            Stmt::MethodCall { callee, method, args } => {
                self.import(callee);
                self.import_all(args);
                push_lines(out, indent, &lang.method_call(callee, method, args));
            }
            Stmt::Call { method, args } => {
                self.import_all(args);
                push_lines(out, indent, &lang.call(method, args));
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.import(value);
                }
                push_lines(out, indent, &lang.return_stmt(value.as_ref()));
            }
            Stmt::If { condition, body } => {
                self.import(condition);
                self.block(out, &lang.if_header(condition), body, indent)?;
            }
            Stmt::While { condition, body } => {
                self.import(condition);
                self.block(out, &lang.while_header(condition), body, indent)?;
            }
            Stmt::For {
                variable,
                start,
                max,
                step,
                body,
            } => {
                self.import(variable.as_value());
                self.import(start);
                self.import(max);
                if let Some(step) = step {
                    self.import(step);
                }
                let header = lang.for_header(variable, start, max, step.as_ref());
                self.block(out, &header, body, indent)?;
            }
            Stmt::Foreach {
                variable,
                iterable,
                body,
            } => {
                self.import(variable.as_value());
                self.import(iterable);
                self.block(out, &lang.foreach_header(variable, iterable), body, indent)?;
            }
            Stmt::Method { signature, body } => {
                self.import_type(&signature.return_type);
                for parameter in &signature.parameters {
                    self.import(parameter.as_value());
                }
                let decl = lang.method(signature);
                if let Some(annotation) = decl.annotation.as_deref().filter(|a| !a.is_empty()) {
                    push_lines(out, indent, annotation);
                }
                self.block(out, &decl.line, body, indent)?;
            }
            Stmt::Constructor {
                visibility,
                class_name,
                parameters,
                body,
            } => {
                for parameter in parameters {
                    self.import(parameter.as_value());
                }
                let header = lang.constructor(*visibility, class_name, parameters)?;
                self.block(out, &header, body, indent)?;
            }
            Stmt::Class { signature, body } => {
                let header = lang.class(signature)?;
                if let Some(extends) = &signature.extends {
                    self.import_type(extends);
                }
                for ty in &signature.implements {
                    self.import_type(ty);
                }
                self.block(out, &header, body, indent)?;
            }
            Stmt::Enum { name, values } => {
                push_lines(out, indent, &lang.enum_class(name, values)?);
            }
            Stmt::Comment(text) => push_lines(out, indent, &lang.comment(text)),
            Stmt::Raw(text) => push_lines(out, indent, text),
            Stmt::Blank => out.push('\n'),
            Stmt::Nested { scope, indent: at } => {
                let nested = self.render_at(scope, at.unwrap_or(indent))?;
                out.push_str(&nested);
            }
        }

        Ok(())
    }

    fn declaration(&mut self, out: &mut String, decl: &Declaration, indent: usize) {
        for ty in &decl.imports {
            self.import_type(ty);
        }
        if let Some(annotation) = decl.annotation.as_deref().filter(|a| !a.is_empty()) {
            push_lines(out, indent, annotation);
        }
        push_lines(out, indent, &decl.line);
    }

    fn block(&mut self, out: &mut String, header: &str, body: &Scope, indent: usize) -> Result<(), LanguageError> {
        let body = self.render_at(body, indent + 1)?;
        out.push_str(&self.lang.block(header, &body, indent));
        out.push('\n');
        Ok(())
    }
}

fn blank_line_before(out: &mut String) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
}

/// Append `text` line by line at `indent` tabs. Empty lines stay empty.
fn push_lines(out: &mut String, indent: usize, text: &str) {
    for line in text.lines() {
        if !line.is_empty() {
            for _ in 0..indent {
                out.push('\t');
            }
            out.push_str(line);
        }
        out.push('\n');
    }
}
