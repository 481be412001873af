//! Target language backends.
//!
//! A [`Language`] turns the abstract program model of `vg_ir` into concrete
//! syntax. Backends are stateless singletons selected per generation pass
//! by [`LanguageId`]:
//!
//! ```text
//! vg_ir::Scope ──render──▶ statement text ──assemble──▶ program text
//!                    │
//!                    └──▶ ImportScope (types used while rendering)
//! ```
//!
//! Default trait methods give the Java spelling; the Kotlin, Lua and Python
//! backends override what differs. Constructs a backend cannot express
//! return [`LanguageError::Unsupported`].

pub mod backend;
mod error;
pub mod render;
pub mod types;

use std::fmt;
use std::str::FromStr;

use vg_ir::{
    csv, ClassSignature, ColorSpace, ImportScope, MethodSignature, Modifiers, Parameter, Scope, Type,
    Value, Variable, Visibility,
};

pub use backend::language;
pub use error::LanguageError;
pub use render::Renderer;

/// Identifier of a target language.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LanguageId {
    Java,
    Kotlin,
    Lua,
    Python,
}

impl LanguageId {
    pub const ALL: [LanguageId; 4] = [
        LanguageId::Java,
        LanguageId::Kotlin,
        LanguageId::Lua,
        LanguageId::Python,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageId::Java => "java",
            LanguageId::Kotlin => "kotlin",
            LanguageId::Lua => "lua",
            LanguageId::Python => "python",
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(LanguageId::Java),
            "kotlin" | "kt" => Ok(LanguageId::Kotlin),
            "lua" => Ok(LanguageId::Lua),
            "python" | "py" | "cpython" => Ok(LanguageId::Python),
            _ => Err(LanguageError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Optional constructs. Nodes check these before generating code that needs
/// them, so a mismatch is reported against the node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Feature {
    Classes,
    Constructors,
    /// Preview-mode `streamFrame` calls.
    StreamFrame,
    /// One import statement per class (`import pkg.Class`).
    ImportDeclarations,
}

impl Feature {
    /// Name used in [`LanguageError::Unsupported`].
    pub fn construct(self) -> &'static str {
        match self {
            Feature::Classes => "class declaration",
            Feature::Constructors => "constructor declaration",
            Feature::StreamFrame => "frame streaming",
            Feature::ImportDeclarations => "import declaration",
        }
    }
}

/// A rendered declaration header plus what it needs on top of its values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declaration {
    /// Line emitted above the declaration (`@Override`, `@Label(...)`).
    pub annotation: Option<String>,
    pub line: String,
    /// Types the declaration itself requires (the label annotation).
    pub imports: Vec<Type>,
}

impl Declaration {
    pub fn line(line: impl Into<String>) -> Self {
        Declaration {
            annotation: None,
            line: line.into(),
            imports: Vec::new(),
        }
    }

    #[must_use]
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    #[must_use]
    pub fn requiring(mut self, ty: Type) -> Self {
        self.imports.push(ty);
        self
    }
}

/// The scopes of one generation pass, ready to be assembled into a program.
#[derive(Copy, Clone, Debug)]
pub struct Program<'a> {
    pub class_name: &'a str,
    pub previz: bool,
    /// Marker text that the resolver replaces with the rendered imports.
    pub import_marker: &'a str,
    pub class_start: &'a Scope,
    pub init: &'a Scope,
    pub process_frame: &'a Scope,
    pub viewport_tapped: &'a Scope,
    pub class_end: &'a Scope,
}

/// `name` turned into a valid identifier: invalid characters become `_`
/// and a leading digit gets a `_` prefix.
pub fn valid_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.is_empty() {
        return "Pipeline".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Double-quoted string literal with `\` and `"` escaped.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Decimal literal that always carries a fractional part (`1` -> `1.0`).
pub fn decimal(text: String) -> String {
    if text.contains(['.', 'e', 'E']) || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        text + ".0"
    }
}

fn parameter_list(lang: &(impl Language + ?Sized), parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| lang.parameter(p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Syntax of one target language.
///
/// Object safe; backends are used as `&'static dyn Language`.
pub trait Language {
    fn id(&self) -> LanguageId;

    fn source_extension(&self) -> &'static str {
        "java"
    }

    fn uses_semicolon(&self) -> bool {
        true
    }

    /// Whether the program is wrapped in a pipeline class.
    fn gen_in_class(&self) -> bool {
        true
    }

    /// Collapse more than two imports from one package into `pkg.*`.
    fn optimize_imports(&self) -> bool {
        true
    }

    fn supports(&self, _feature: Feature) -> bool {
        true
    }

    fn semicolon(&self) -> &'static str {
        if self.uses_semicolon() {
            ";"
        } else {
            ""
        }
    }

    // Types

    fn boolean_type(&self) -> Type {
        types::boolean()
    }

    fn int_type(&self) -> Type {
        types::int()
    }

    fn long_type(&self) -> Type {
        types::long()
    }

    fn float_type(&self) -> Type {
        types::float()
    }

    fn double_type(&self) -> Type {
        types::double()
    }

    fn void_type(&self) -> Type {
        types::void()
    }

    fn string_type(&self) -> Type {
        types::java::string()
    }

    /// Types that never get an import statement.
    fn excluded_imports(&self) -> Vec<Type> {
        vec![types::java::string()]
    }

    fn is_import_excluded(&self, ty: &Type) -> bool {
        let target = ty.import_target();
        self.excluded_imports().iter().any(|excluded| excluded == target)
    }

    // Values

    fn true_value(&self) -> Value {
        Value::new(self.boolean_type(), "true")
    }

    fn false_value(&self) -> Value {
        Value::new(self.boolean_type(), "false")
    }

    fn boolean(&self, value: bool) -> Value {
        if value {
            self.true_value()
        } else {
            self.false_value()
        }
    }

    fn null_value(&self, ty: Type) -> Value {
        Value::new(ty, "null")
    }

    fn int(&self, value: i64) -> Value {
        Value::new(self.int_type(), value.to_string())
    }

    fn long(&self, value: i64) -> Value {
        Value::new(self.long_type(), format!("{value}L"))
    }

    fn float(&self, value: f32) -> Value {
        Value::new(self.float_type(), format!("{}f", decimal(value.to_string())))
    }

    fn double(&self, value: f64) -> Value {
        Value::new(self.double_type(), decimal(value.to_string()))
    }

    /// `value` as an int: a literal when its text parses, a cast otherwise.
    fn int_of(&self, value: &Value) -> Value {
        match value.text().and_then(|t| t.trim().parse::<i64>().ok()) {
            Some(i) => self.int(i),
            None => self.cast(value, &self.int_type()),
        }
    }

    fn long_of(&self, value: &Value) -> Value {
        let parsed = value
            .text()
            .and_then(|t| t.trim().trim_end_matches(['l', 'L']).parse::<i64>().ok());
        match parsed {
            Some(l) => self.long(l),
            None => self.cast(value, &self.long_type()),
        }
    }

    fn float_of(&self, value: &Value) -> Value {
        let parsed = value
            .text()
            .and_then(|t| t.trim().trim_end_matches(['f', 'F']).parse::<f32>().ok());
        match parsed {
            Some(f) => self.float(f),
            None => self.cast(value, &self.float_type()),
        }
    }

    fn double_of(&self, value: &Value) -> Value {
        let parsed = value
            .text()
            .and_then(|t| t.trim().trim_end_matches(['d', 'D']).parse::<f64>().ok());
        match parsed {
            Some(d) => self.double(d),
            None => self.cast(value, &self.double_type()),
        }
    }

    fn condition(&self, text: String) -> Value {
        Value::condition(self.boolean_type(), text)
    }

    fn relational(&self, left: &Value, operator: &str, right: &Value) -> Value {
        self.condition(format!("{} {operator} {}", left.text_or_empty(), right.text_or_empty()))
            .with_imports_of([left, right])
    }

    fn less_than(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, "<", right)
    }

    fn less_or_equal(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, "<=", right)
    }

    fn greater_than(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, ">", right)
    }

    fn greater_or_equal(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, ">=", right)
    }

    fn equals(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, "==", right)
    }

    fn not_equals(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, "!=", right)
    }

    fn object_equals(&self, left: &Value, right: &Value) -> Value {
        self.condition(format!("{}.equals({})", left.text_or_empty(), right.text_or_empty()))
            .with_imports_of([left, right])
    }

    fn and(&self, left: &Value, right: &Value) -> Value {
        self.condition(format!("({}) && ({})", left.text_or_empty(), right.text_or_empty()))
            .with_imports_of([left, right])
    }

    fn or(&self, left: &Value, right: &Value) -> Value {
        self.condition(format!("({}) || ({})", left.text_or_empty(), right.text_or_empty()))
            .with_imports_of([left, right])
    }

    fn not(&self, condition: &Value) -> Value {
        self.condition(format!("!({})", condition.text_or_empty()))
            .with_imports_of([condition])
    }

    /// Widening rule: double > float > long > int.
    fn relevant_number_type(&self, a: &Type, b: &Type) -> Type {
        for ty in [self.double_type(), self.float_type(), self.long_type()] {
            if *a == ty || *b == ty {
                return ty;
            }
        }
        self.int_type()
    }

    fn arithmetic(&self, a: &Value, operator: &str, b: &Value) -> Value {
        Value::operation(
            self.relevant_number_type(a.ty(), b.ty()),
            format!("{} {operator} {}", a.operand_text(), b.operand_text()),
        )
        .with_imports_of([a, b])
    }

    fn sum(&self, a: &Value, b: &Value) -> Value {
        self.arithmetic(a, "+", b)
    }

    fn subtraction(&self, a: &Value, b: &Value) -> Value {
        self.arithmetic(a, "-", b)
    }

    fn multiplication(&self, a: &Value, b: &Value) -> Value {
        self.arithmetic(a, "*", b)
    }

    fn division(&self, a: &Value, b: &Value) -> Value {
        self.arithmetic(a, "/", b)
    }

    fn string(&self, text: &str) -> Value {
        Value::new(self.string_type(), quote(text))
    }

    fn new_instance(&self, ty: &Type, args: &[Value]) -> Value {
        let diamond = if ty.has_generics() { "<>" } else { "" };
        Value::new(ty.clone(), format!("new {}{diamond}({})", ty.name(), csv(args))).with_imports_of(args)
    }

    fn array_of(&self, ty: &Type) -> Type {
        Type::new(format!("{}[]", ty.short_name_with_generics()), ty.package())
            .importing(ty.import_target().clone())
            .array()
    }

    fn new_array(&self, ty: &Type, size: &Value) -> Value {
        Value::new(self.array_of(ty), format!("new {}[{}]", ty.name(), size.text_or_empty()))
            .with_imports_of([size])
    }

    fn new_array_of(&self, ty: &Type, values: &[Value]) -> Value {
        Value::new(self.array_of(ty), format!("new {}[] {{ {} }}", ty.name(), csv(values)))
            .with_imports_of(values)
    }

    fn array_size(&self, array: &Value) -> Value {
        Value::new(self.int_type(), format!("{}.length", array.text_or_empty())).with_imports_of([array])
    }

    fn array_value(&self, from: &Value, index: &Value, ty: Type) -> Value {
        Value::new(ty, format!("{}[{}]", from.text_or_empty(), index.text_or_empty())).with_imports_of([from, index])
    }

    fn cast(&self, value: &Value, to: &Type) -> Value {
        Value::new(
            to.clone(),
            format!("(({}) ({}))", to.short_name_with_generics(), value.text_or_empty()),
        )
        .with_imports_of([value])
    }

    fn call_value(&self, method: &str, returns: Type, args: &[Value]) -> Value {
        Value::new(returns, format!("{method}({})", csv(args))).with_imports_of(args)
    }

    fn static_call_value(&self, class: &Type, method: &str, returns: Type, args: &[Value]) -> Value {
        Value::new(returns, format!("{}.{method}({})", class.name(), csv(args)))
            .with_imports([class.clone()])
            .with_imports_of(args)
    }

    fn method_call_value(&self, callee: &Value, method: &str, returns: Type, args: &[Value]) -> Value {
        Value::new(returns, format!("{}.{method}({})", callee.text_or_empty(), csv(args)))
            .with_imports_of([callee])
            .with_imports_of(args)
    }

    fn property_value(&self, from: &Value, property: &str, ty: Type) -> Value {
        Value::new(ty, format!("{}.{property}", from.text_or_empty())).with_imports_of([from])
    }

    fn enum_value(&self, ty: &Type, constant: &str) -> Value {
        Value::new(ty.clone(), format!("{}.{constant}", ty.name()))
    }

    /// Color conversion constant (`Imgproc.COLOR_RGB2HSV`).
    fn cvt_color_value(&self, from: ColorSpace, to: ColorSpace) -> Value {
        let (a, b) = from.conversion_names(to);
        Value::new(self.int_type(), format!("Imgproc.COLOR_{a}2{b}")).with_imports([types::opencv::imgproc()])
    }

    /// Matrix type constant (`CvType.CV_8UC1`).
    fn cv_type_value(&self, name: &str) -> Value {
        Value::new(self.int_type(), format!("CvType.{name}")).with_imports([types::opencv::cv_type()])
    }

    // Declarations and statements

    fn parameter(&self, parameter: &Parameter) -> String {
        let fin = if parameter.is_final() { "final " } else { "" };
        format!("{fin}{} {}", parameter.ty().short_name_with_generics(), parameter.name())
    }

    fn parameters(&self, parameters: &[Parameter]) -> String {
        parameter_list(self, parameters)
    }

    fn instance_variable(
        &self,
        visibility: Visibility,
        variable: &Variable,
        label: Option<&str>,
        modifiers: Modifiers,
    ) -> Declaration {
        let mut mods = String::new();
        if modifiers.contains(Modifiers::STATIC) {
            mods.push_str(" static");
        }
        if modifiers.contains(Modifiers::FINAL) {
            mods.push_str(" final");
        }
        let init = match variable.initial().text() {
            Some(text) => format!(" = {text}"),
            None => String::new(),
        };

        let decl = Declaration::line(format!(
            "{visibility}{mods} {} {}{init}{}",
            variable.ty().short_name_with_generics(),
            variable.name(),
            self.semicolon()
        ));

        match label {
            Some(label) => decl
                .annotated(format!("@Label(name = {})", quote(label)))
                .requiring(types::java::label_annotation()),
            None => decl,
        }
    }

    fn local_variable(&self, variable: &Variable, is_final: bool) -> String {
        let fin = if is_final { "final " } else { "" };
        let init = match variable.initial().text() {
            Some(text) => format!(" = {text}"),
            None => String::new(),
        };
        format!(
            "{fin}{} {}{init}{}",
            variable.ty().short_name_with_generics(),
            variable.name(),
            self.semicolon()
        )
    }

    fn assignment(&self, variable: &Variable, value: &Value) -> String {
        format!("{} = {}{}", variable.name(), value.text_or_empty(), self.semicolon())
    }

    fn array_assignment(&self, variable: &Variable, index: &Value, value: &Value) -> String {
        format!(
            "{}[{}] = {}{}",
            variable.name(),
            index.text_or_empty(),
            value.text_or_empty(),
            self.semicolon()
        )
    }

    fn instance_assignment(&self, variable: &Variable, value: &Value) -> String {
        format!("this.{} = {}{}", variable.name(), value.text_or_empty(), self.semicolon())
    }

    fn static_call(&self, class: &Type, method: &str, args: &[Value]) -> String {
        format!("{}.{method}({}){}", class.name(), csv(args), self.semicolon())
    }

    fn method_call(&self, callee: &Value, method: &str, args: &[Value]) -> String {
        format!("{}.{method}({}){}", callee.text_or_empty(), csv(args), self.semicolon())
    }

    fn call(&self, method: &str, args: &[Value]) -> String {
        format!("{method}({}){}", csv(args), self.semicolon())
    }

    /// Preview-mode frame streaming call.
    fn stream_frame(&self, id: &Value, mat: &Value, conversion: Option<&Value>) -> Result<String, LanguageError> {
        let conversion = conversion.cloned().unwrap_or_else(|| self.null_value(self.void_type()));
        Ok(self.call("streamFrame", &[id.clone(), mat.clone(), conversion]))
    }

    fn constructor(
        &self,
        visibility: Visibility,
        class_name: &str,
        parameters: &[Parameter],
    ) -> Result<String, LanguageError> {
        Ok(format!("{visibility} {class_name}({})", self.parameters(parameters)))
    }

    fn method(&self, signature: &MethodSignature) -> Declaration {
        let m = signature.modifiers;
        let mut mods = String::new();
        if m.contains(Modifiers::SYNCHRONIZED) {
            mods.push_str("synchronized ");
        }
        if m.contains(Modifiers::STATIC) {
            mods.push_str("static ");
        }
        if m.contains(Modifiers::FINAL) {
            mods.push_str("final ");
        }

        let decl = Declaration::line(format!(
            "{} {mods}{} {}({})",
            signature.visibility,
            signature.return_type.short_name_with_generics(),
            signature.name,
            self.parameters(&signature.parameters)
        ));

        if m.contains(Modifiers::OVERRIDE) {
            decl.annotated("@Override")
        } else {
            decl
        }
    }

    fn return_stmt(&self, value: Option<&Value>) -> String {
        match value {
            Some(value) => format!("return {}{}", value.text_or_empty(), self.semicolon()),
            None => format!("return{}", self.semicolon()),
        }
    }

    fn if_header(&self, condition: &Value) -> String {
        format!("if({})", condition.text_or_empty())
    }

    fn while_header(&self, condition: &Value) -> String {
        format!("while({})", condition.text_or_empty())
    }

    fn for_header(&self, variable: &Variable, start: &Value, max: &Value, step: Option<&Value>) -> String {
        let name = variable.name();
        let step = match step.and_then(Value::text) {
            None | Some("1") => "++".to_string(),
            Some(step) => format!(" += {step}"),
        };
        format!(
            "for({} {name} = {} ; {name} < {} ; {name}{step})",
            variable.ty().short_name_with_generics(),
            start.text_or_empty(),
            max.text_or_empty()
        )
    }

    fn foreach_header(&self, variable: &Variable, iterable: &Value) -> String {
        format!(
            "for({} {} : {})",
            variable.ty().short_name_with_generics(),
            variable.name(),
            iterable.text_or_empty()
        )
    }

    fn class(&self, signature: &ClassSignature) -> Result<String, LanguageError> {
        let mut line = format!("{} ", signature.visibility);
        if signature.modifiers.contains(Modifiers::STATIC) {
            line.push_str("static ");
        }
        if signature.modifiers.contains(Modifiers::FINAL) {
            line.push_str("final ");
        }
        line.push_str("class ");
        line.push_str(&signature.name);

        if let Some(extends) = &signature.extends {
            line.push_str(" extends ");
            line.push_str(&extends.short_name_with_generics());
        }
        if !signature.implements.is_empty() {
            let names: Vec<String> = signature.implements.iter().map(Type::short_name_with_generics).collect();
            line.push_str(" implements ");
            line.push_str(&names.join(", "));
        }
        Ok(line)
    }

    fn enum_class(&self, name: &str, values: &[String]) -> Result<String, LanguageError> {
        Ok(format!("enum {name} {{ {} }}", values.join(", ")))
    }

    fn comment(&self, text: &str) -> String {
        text.lines().map(|line| format!("// {line}")).collect::<Vec<_>>().join("\n")
    }

    /// A block statement: `header`, then `body` (already rendered at
    /// `indent + 1`), then the closing delimiter.
    fn block(&self, header: &str, body: &str, indent: usize) -> String {
        let tabs = "\t".repeat(indent);
        format!("{tabs}{} {{\n{body}{tabs}}}", header.trim())
    }

    fn import_declaration(&self, package: &str, class: &str) -> Result<String, LanguageError> {
        Ok(format!("import {package}.{class}{}", self.semicolon()))
    }

    /// Import statements for every non-excluded type in `imports`.
    fn render_imports(&self, imports: &ImportScope) -> Result<String, LanguageError> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();

        for ty in imports.types() {
            if self.is_import_excluded(ty) || ty.package().is_empty() {
                continue;
            }

            match groups.iter_mut().find(|(package, _)| *package == ty.package()) {
                Some((_, classes)) => {
                    if classes.len() == 1 && classes[0] == "*" {
                        continue;
                    }
                    if classes.len() > 2 && self.optimize_imports() {
                        classes.clear();
                        classes.push("*");
                    } else if !classes.contains(&ty.name()) {
                        classes.push(ty.name());
                    }
                }
                None => groups.push((ty.package(), vec![ty.name()])),
            }
        }

        let mut lines = Vec::new();
        for (package, classes) in groups {
            for class in classes {
                lines.push(self.import_declaration(package, class)?);
            }
        }
        Ok(lines.join("\n"))
    }

    /// Render the whole program. Imports used by the rendered statements are
    /// registered on `imports`; the import marker is left in place.
    fn assemble(&self, program: &Program<'_>, imports: &mut ImportScope) -> Result<String, LanguageError>;
}
