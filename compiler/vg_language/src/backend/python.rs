use vg_ir::{
    csv, ClassSignature, ColorSpace, ImportScope, MethodSignature, Modifiers, Parameter, Scope, Type, Value,
    Variable, Visibility,
};

use crate::types::python;
use crate::{quote, Declaration, Feature, Language, LanguageError, LanguageId, Program, Renderer};

/// CPython with `cv2`/numpy. No classes, the program is a `runPipeline`
/// function.
#[derive(Copy, Clone, Debug, Default)]
pub struct PythonLanguage;

impl PythonLanguage {
    /// `(a, b)`
    pub fn tuple(&self, values: &[Value]) -> Value {
        Value::new(python::no_type(), format!("({})", csv(values))).with_imports_of(values)
    }

    /// `name=value`
    pub fn named_argument(&self, name: &str, value: &Value) -> Value {
        Value::new(python::no_type(), format!("{name}={}", value.text_or_empty())).with_imports_of([value])
    }

    /// `start:end:step`, each part optional.
    pub fn slice(&self, start: Option<&Value>, end: Option<&Value>, step: Option<&Value>) -> Value {
        let mut text = String::new();
        if let Some(start) = start {
            text.push_str(start.text_or_empty());
        }
        text.push(':');
        if let Some(end) = end {
            text.push_str(end.text_or_empty());
        }
        if let Some(step) = step {
            text.push(':');
            text.push_str(step.text_or_empty());
        }
        Value::new(python::no_type(), text)
    }

    pub fn value_is(&self, value: &Value, ty: &Type) -> Value {
        self.condition(format!("{} is {}", value.text_or_empty(), ty.name()))
            .with_imports_of([value])
    }

    pub fn value_is_not(&self, value: &Value, ty: &Type) -> Value {
        self.condition(format!("{} is not {}", value.text_or_empty(), ty.name()))
            .with_imports_of([value])
    }
}

impl Language for PythonLanguage {
    fn id(&self) -> LanguageId {
        LanguageId::Python
    }

    fn source_extension(&self) -> &'static str {
        "py"
    }

    fn uses_semicolon(&self) -> bool {
        false
    }

    fn gen_in_class(&self) -> bool {
        false
    }

    fn supports(&self, _feature: Feature) -> bool {
        false
    }

    fn boolean_type(&self) -> Type {
        Type::primitive("bool")
    }

    fn int_type(&self) -> Type {
        python::no_type()
    }

    fn long_type(&self) -> Type {
        python::no_type()
    }

    fn float_type(&self) -> Type {
        python::no_type()
    }

    fn double_type(&self) -> Type {
        python::no_type()
    }

    fn void_type(&self) -> Type {
        python::no_type()
    }

    fn string_type(&self) -> Type {
        Type::primitive("str")
    }

    fn excluded_imports(&self) -> Vec<Type> {
        Vec::new()
    }

    fn true_value(&self) -> Value {
        Value::new(self.boolean_type(), "True")
    }

    fn false_value(&self) -> Value {
        Value::new(self.boolean_type(), "False")
    }

    fn null_value(&self, ty: Type) -> Value {
        Value::new(ty, "None")
    }

    fn long(&self, value: i64) -> Value {
        self.int(value)
    }

    fn float(&self, value: f32) -> Value {
        Value::new(self.float_type(), crate::decimal(value.to_string()))
    }

    fn int_of(&self, value: &Value) -> Value {
        self.call_value("int", self.int_type(), std::slice::from_ref(value))
    }

    fn long_of(&self, value: &Value) -> Value {
        self.int_of(value)
    }

    fn float_of(&self, value: &Value) -> Value {
        self.call_value("float", self.float_type(), std::slice::from_ref(value))
    }

    fn double_of(&self, value: &Value) -> Value {
        self.float_of(value)
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

    fn array_of(&self, ty: &Type) -> Type {
        ty.clone()
    }

    fn new_array(&self, ty: &Type, _size: &Value) -> Value {
        Value::new(self.array_of(ty), "[]")
    }

    fn new_array_of(&self, ty: &Type, values: &[Value]) -> Value {
        Value::new(self.array_of(ty), format!("[{}]", csv(values))).with_imports_of(values)
    }

    fn array_size(&self, array: &Value) -> Value {
        Value::new(self.int_type(), format!("len({})", array.text_or_empty())).with_imports_of([array])
    }

    fn enum_value(&self, ty: &Type, constant: &str) -> Value {
        Value::new(ty.clone(), format!("{}[{}]", ty.name(), quote(constant)))
    }

    fn cvt_color_value(&self, from: ColorSpace, to: ColorSpace) -> Value {
        let (a, b) = from.conversion_names(to);
        Value::new(python::no_type(), format!("cv2.COLOR_{a}2{b}")).with_imports([python::cv2()])
    }

    fn cv_type_value(&self, name: &str) -> Value {
        Value::new(python::no_type(), format!("cv2.{name}")).with_imports([python::cv2()])
    }

    fn parameter(&self, parameter: &Parameter) -> String {
        parameter.name().to_string()
    }

    fn instance_variable(
        &self,
        _visibility: Visibility,
        variable: &Variable,
        _label: Option<&str>,
        _modifiers: Modifiers,
    ) -> Declaration {
        Declaration::line(format!(
            "{} = {}",
            variable.name(),
            variable.initial().text().unwrap_or("None")
        ))
    }

    fn local_variable(&self, variable: &Variable, _is_final: bool) -> String {
        format!(
            "{} = {}",
            variable.name(),
            variable.initial().text().unwrap_or("None")
        )
    }

    fn instance_assignment(&self, variable: &Variable, value: &Value) -> String {
        self.assignment(variable, value)
    }

    fn stream_frame(&self, _id: &Value, _mat: &Value, _conversion: Option<&Value>) -> Result<String, LanguageError> {
        Err(LanguageError::unsupported(LanguageId::Python, "frame streaming"))
    }

    fn constructor(
        &self,
        _visibility: Visibility,
        _class_name: &str,
        _parameters: &[Parameter],
    ) -> Result<String, LanguageError> {
        Err(LanguageError::unsupported(LanguageId::Python, "constructor declaration"))
    }

    fn method(&self, signature: &MethodSignature) -> Declaration {
        Declaration::line(format!(
            "def {}({})",
            signature.name,
            self.parameters(&signature.parameters)
        ))
    }

    fn if_header(&self, condition: &Value) -> String {
        format!("if {}", condition.text_or_empty())
    }

    fn while_header(&self, condition: &Value) -> String {
        format!("while {}", condition.text_or_empty())
    }

    fn for_header(&self, variable: &Variable, start: &Value, max: &Value, step: Option<&Value>) -> String {
        let step = match step.and_then(Value::text) {
            None | Some("1") => String::new(),
            Some(step) => format!(", {step}"),
        };
        format!(
            "for {} in range({}, {}{step})",
            variable.name(),
            start.text_or_empty(),
            max.text_or_empty()
        )
    }

    fn foreach_header(&self, variable: &Variable, iterable: &Value) -> String {
        format!("for {} in {}", variable.name(), iterable.text_or_empty())
    }

    fn class(&self, _signature: &ClassSignature) -> Result<String, LanguageError> {
        Err(LanguageError::unsupported(LanguageId::Python, "class declaration"))
    }

    fn enum_class(&self, name: &str, values: &[String]) -> Result<String, LanguageError> {
        let mut out = format!("{name} = {{\n");
        for value in values {
            out.push_str(&format!("\t{}: {},\n", quote(value), quote(value)));
        }
        out.push('}');
        Ok(out)
    }

    fn comment(&self, text: &str) -> String {
        text.lines().map(|line| format!("# {line}")).collect::<Vec<_>>().join("\n")
    }

    /// Colon header and an indented body. An empty body becomes `pass`.
    fn block(&self, header: &str, body: &str, indent: usize) -> String {
        let tabs = "\t".repeat(indent);
        let body = body.trim_end_matches('\n');
        if body.trim().is_empty() {
            format!("{tabs}{}:\n{tabs}\tpass", header.trim())
        } else {
            format!("{tabs}{}:\n{body}", header.trim())
        }
    }

    fn import_declaration(&self, _package: &str, _class: &str) -> Result<String, LanguageError> {
        Err(LanguageError::unsupported(LanguageId::Python, "import declaration"))
    }

    /// `import module [as alias]` for a module used through a single name,
    /// `from module import a, b` when several names come from one module.
    fn render_imports(&self, imports: &ImportScope) -> Result<String, LanguageError> {
        let mut modules: Vec<(&str, Vec<&str>)> = Vec::new();

        for ty in imports.types() {
            if self.is_import_excluded(ty) || !ty.should_import() {
                continue;
            }
            match modules.iter_mut().find(|(module, _)| *module == ty.package()) {
                Some((_, names)) => {
                    if !names.contains(&ty.name()) {
                        names.push(ty.name());
                    }
                }
                None => modules.push((ty.package(), vec![ty.name()])),
            }
        }

        let lines: Vec<String> = modules
            .into_iter()
            .map(|(module, names)| match names.as_slice() {
                [name] if *name == module => format!("import {module}"),
                [alias] => format!("import {module} as {alias}"),
                _ => format!("from {module} import {}", names.join(", ")),
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn assemble(&self, program: &Program<'_>, imports: &mut ImportScope) -> Result<String, LanguageError> {
        tracing::debug!(previz = program.previz, "assembling runPipeline");

        let mut main = Scope::new(0);
        main.write(program.import_marker);
        main.separate();

        if !program.class_start.is_empty() {
            main.nest_at(program.class_start.clone(), 0);
            main.separate();
        }

        if !program.init.is_empty() {
            main.nest_at(program.init.clone(), 0);
            main.separate();
        }

        let run = MethodSignature::new(Visibility::Public, python::no_type(), "runPipeline")
            .param(Parameter::new(python::no_type(), "input"))
            .param(Parameter::new(python::no_type(), "llrobot"));
        main.method_with_body(run, program.process_frame.clone());

        if !program.class_end.is_empty() {
            main.nest_at(program.class_end.clone(), 0);
        }

        Renderer::new(self, imports, program.previz).render(&main)
    }
}
