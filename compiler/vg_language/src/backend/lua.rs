use vg_ir::{csv, ClassSignature, ImportScope, MethodSignature, Modifiers, Parameter, Type, Value, Variable, Visibility};

use super::pipeline::assemble_pipeline;
use crate::{quote, Declaration, Feature, Language, LanguageError, LanguageId, Program};

/// Lua scripts running against the OpenCV Java bindings through a Java
/// bridge. No classes; methods become global functions.
#[derive(Copy, Clone, Debug, Default)]
pub struct LuaLanguage;

const FOR_EACH_SMART: &str = "function forEachSmart(array, func)
\tfor i, v in ipairs(array) do
\t\tfunc(v)
\tend
end";

impl Language for LuaLanguage {
    fn id(&self) -> LanguageId {
        LanguageId::Lua
    }

    fn source_extension(&self) -> &'static str {
        "lua"
    }

    fn uses_semicolon(&self) -> bool {
        false
    }

    fn gen_in_class(&self) -> bool {
        false
    }

    fn optimize_imports(&self) -> bool {
        false
    }

    fn supports(&self, feature: Feature) -> bool {
        matches!(feature, Feature::StreamFrame)
    }

    fn null_value(&self, ty: Type) -> Value {
        Value::new(ty, "nil")
    }

    fn not_equals(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, "~=", right)
    }

    fn object_equals(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, "==", right)
    }

    fn and(&self, left: &Value, right: &Value) -> Value {
        self.condition(format!("({}) and ({})", left.text_or_empty(), right.text_or_empty()))
            .with_imports_of([left, right])
    }

    fn or(&self, left: &Value, right: &Value) -> Value {
        self.condition(format!("({}) or ({})", left.text_or_empty(), right.text_or_empty()))
            .with_imports_of([left, right])
    }

    fn not(&self, condition: &Value) -> Value {
        self.condition(format!("not ({})", condition.text_or_empty()))
            .with_imports_of([condition])
    }

    fn cast(&self, value: &Value, to: &Type) -> Value {
        Value::new(to.clone(), value.text_or_empty()).with_imports_of([value])
    }

    fn new_instance(&self, ty: &Type, args: &[Value]) -> Value {
        Value::new(ty.clone(), format!("{}({})", ty.name(), csv(args))).with_imports_of(args)
    }

    fn new_array(&self, ty: &Type, size: &Value) -> Value {
        Value::new(
            self.array_of(ty),
            format!("java.array({}, {})", ty.name(), size.text_or_empty()),
        )
        .with_imports([ty.clone()])
        .with_imports_of([size])
    }

    fn new_array_of(&self, ty: &Type, values: &[Value]) -> Value {
        Value::new(self.array_of(ty), format!("{{ {} }}", csv(values))).with_imports_of(values)
    }

    fn array_size(&self, array: &Value) -> Value {
        Value::new(self.int_type(), format!("#{}", array.text_or_empty())).with_imports_of([array])
    }

    fn static_call_value(&self, class: &Type, method: &str, returns: Type, args: &[Value]) -> Value {
        Value::new(returns, format!("{}:{method}({})", class.name(), csv(args)))
            .with_imports([class.clone()])
            .with_imports_of(args)
    }

    fn method_call_value(&self, callee: &Value, method: &str, returns: Type, args: &[Value]) -> Value {
        Value::new(returns, format!("{}:{method}({})", callee.text_or_empty(), csv(args)))
            .with_imports_of([callee])
            .with_imports_of(args)
    }

    fn parameter(&self, parameter: &Parameter) -> String {
        parameter.name().to_string()
    }

    fn instance_variable(
        &self,
        _visibility: Visibility,
        variable: &Variable,
        label: Option<&str>,
        _modifiers: Modifiers,
    ) -> Declaration {
        let decl = Declaration::line(format!(
            "{} = {}",
            variable.name(),
            variable.initial().text().unwrap_or("nil")
        ));

        match label {
            Some(label) => decl.annotated(format!("label({}, {})", quote(label), quote(variable.name()))),
            None => decl,
        }
    }

    fn local_variable(&self, variable: &Variable, _is_final: bool) -> String {
        format!(
            "local {} = {}",
            variable.name(),
            variable.initial().text().unwrap_or("nil")
        )
    }

    fn instance_assignment(&self, variable: &Variable, value: &Value) -> String {
        self.assignment(variable, value)
    }

    fn static_call(&self, class: &Type, method: &str, args: &[Value]) -> String {
        format!("{}:{method}({})", class.name(), csv(args))
    }

    fn method_call(&self, callee: &Value, method: &str, args: &[Value]) -> String {
        format!("{}:{method}({})", callee.text_or_empty(), csv(args))
    }

    fn stream_frame(&self, id: &Value, mat: &Value, conversion: Option<&Value>) -> Result<String, LanguageError> {
        let conversion = conversion.cloned().unwrap_or_else(|| self.null_value(self.void_type()));
        Ok(self.call("stream", &[id.clone(), mat.clone(), conversion]))
    }

    fn constructor(
        &self,
        _visibility: Visibility,
        _class_name: &str,
        _parameters: &[Parameter],
    ) -> Result<String, LanguageError> {
        Err(LanguageError::unsupported(LanguageId::Lua, "constructor declaration"))
    }

    fn method(&self, signature: &MethodSignature) -> Declaration {
        Declaration::line(format!(
            "function {}({})",
            signature.name,
            self.parameters(&signature.parameters)
        ))
    }

    fn if_header(&self, condition: &Value) -> String {
        format!("if {} then", condition.text_or_empty())
    }

    fn while_header(&self, condition: &Value) -> String {
        format!("while {} do", condition.text_or_empty())
    }

    /// Lua ranges are inclusive, so the exclusive maximum is lowered by one.
    fn for_header(&self, variable: &Variable, start: &Value, max: &Value, step: Option<&Value>) -> String {
        let step = match step.and_then(Value::text) {
            None | Some("1") => String::new(),
            Some(step) => format!(", {step}"),
        };
        format!(
            "for {} = {}, {} - 1{step} do",
            variable.name(),
            start.text_or_empty(),
            max.operand_text()
        )
    }

    fn foreach_header(&self, variable: &Variable, iterable: &Value) -> String {
        format!(
            "for _, {} in ipairs(java.luaify({})) do",
            variable.name(),
            iterable.text_or_empty()
        )
    }

    fn class(&self, _signature: &ClassSignature) -> Result<String, LanguageError> {
        Err(LanguageError::unsupported(LanguageId::Lua, "class declaration"))
    }

    fn enum_class(&self, name: &str, values: &[String]) -> Result<String, LanguageError> {
        let mut out = format!("local {name} = {{\n");
        for value in values {
            out.push_str(&format!("\t{value} = {},\n", quote(value)));
        }
        out.push('}');
        Ok(out)
    }

    fn comment(&self, text: &str) -> String {
        text.lines().map(|line| format!("-- {line}")).collect::<Vec<_>>().join("\n")
    }

    fn block(&self, header: &str, body: &str, indent: usize) -> String {
        let tabs = "\t".repeat(indent);
        format!("{tabs}{}\n{body}{tabs}end", header.trim())
    }

    fn import_declaration(&self, _package: &str, _class: &str) -> Result<String, LanguageError> {
        Err(LanguageError::unsupported(LanguageId::Lua, "import declaration"))
    }

    /// `Name = java.import('pkg.Name')` per class, then the `forEachSmart`
    /// helper.
    fn render_imports(&self, imports: &ImportScope) -> Result<String, LanguageError> {
        let mut lines = Vec::new();
        for ty in imports.types() {
            if self.is_import_excluded(ty) || ty.package().is_empty() {
                continue;
            }
            let line = format!("{} = java.import('{}.{}')", ty.name(), ty.package(), ty.name());
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
        lines.push(FOR_EACH_SMART.to_string());
        Ok(lines.join("\n"))
    }

    fn assemble(&self, program: &Program<'_>, imports: &mut ImportScope) -> Result<String, LanguageError> {
        assemble_pipeline(self, program, imports)
    }
}
