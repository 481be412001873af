use vg_ir::{csv, ClassSignature, ImportScope, MethodSignature, Modifiers, Parameter, Type, Value, Variable, Visibility};

use super::pipeline::assemble_pipeline;
use crate::types::{java, kotlin};
use crate::{Declaration, Language, LanguageError, LanguageId, Program};

/// Kotlin on the JVM.
#[derive(Copy, Clone, Debug, Default)]
pub struct KotlinLanguage;

fn visibility_prefix(visibility: Visibility) -> String {
    match visibility {
        Visibility::Public => String::new(),
        other => format!("{other} "),
    }
}

impl KotlinLanguage {
    fn is_unit(&self, ty: &Type) -> bool {
        *ty == self.void_type() || ty.name() == "void"
    }
}

impl Language for KotlinLanguage {
    fn id(&self) -> LanguageId {
        LanguageId::Kotlin
    }

    fn source_extension(&self) -> &'static str {
        "kt"
    }

    fn uses_semicolon(&self) -> bool {
        false
    }

    fn boolean_type(&self) -> Type {
        kotlin::boolean()
    }

    fn int_type(&self) -> Type {
        kotlin::int()
    }

    fn long_type(&self) -> Type {
        kotlin::long()
    }

    fn float_type(&self) -> Type {
        kotlin::float()
    }

    fn double_type(&self) -> Type {
        kotlin::double()
    }

    fn void_type(&self) -> Type {
        kotlin::unit()
    }

    fn excluded_imports(&self) -> Vec<Type> {
        vec![java::string(), kotlin::unit()]
    }

    fn cast(&self, value: &Value, to: &Type) -> Value {
        Value::new(
            to.clone(),
            format!("({} as {})", value.text_or_empty(), to.short_name_with_generics()),
        )
        .with_imports_of([value])
    }

    fn new_instance(&self, ty: &Type, args: &[Value]) -> Value {
        Value::new(ty.clone(), format!("{}({})", ty.short_name_with_generics(), csv(args))).with_imports_of(args)
    }

    fn array_of(&self, ty: &Type) -> Type {
        Type::primitive("Array").with_generics([ty.clone()]).array()
    }

    fn new_array(&self, ty: &Type, size: &Value) -> Value {
        Value::new(
            self.array_of(ty),
            format!("arrayOfNulls<{}>({})", ty.short_name_with_generics(), size.text_or_empty()),
        )
        .with_imports_of([size])
    }

    fn new_array_of(&self, ty: &Type, values: &[Value]) -> Value {
        Value::new(self.array_of(ty), format!("arrayOf({})", csv(values))).with_imports_of(values)
    }

    fn array_size(&self, array: &Value) -> Value {
        Value::new(self.int_type(), format!("{}.size", array.text_or_empty())).with_imports_of([array])
    }

    fn object_equals(&self, left: &Value, right: &Value) -> Value {
        self.relational(left, "==", right)
    }

    fn parameter(&self, parameter: &Parameter) -> String {
        format!("{}: {}", parameter.name(), parameter.ty().short_name_with_generics())
    }

    fn instance_variable(
        &self,
        visibility: Visibility,
        variable: &Variable,
        label: Option<&str>,
        modifiers: Modifiers,
    ) -> Declaration {
        let is_final = modifiers.contains(Modifiers::FINAL);
        let keyword = match (is_final, variable.initial().text()) {
            (true, _) => "val",
            (false, Some(_)) => "var",
            (false, None) => "lateinit var",
        };
        let init = match variable.initial().text() {
            Some(text) => format!(" = {text}"),
            None => String::new(),
        };

        let decl = Declaration::line(format!(
            "{}{keyword} {}: {}{init}",
            visibility_prefix(visibility),
            variable.name(),
            variable.ty().short_name_with_generics()
        ));

        match label {
            Some(label) => decl
                .annotated(format!("@Label(name = {})", crate::quote(label)))
                .requiring(java::label_annotation()),
            None => decl,
        }
    }

    fn local_variable(&self, variable: &Variable, is_final: bool) -> String {
        let keyword = if is_final { "val" } else { "var" };
        let init = match variable.initial().text() {
            Some(text) => format!(" = {text}"),
            None => String::new(),
        };
        format!(
            "{keyword} {}: {}{init}",
            variable.name(),
            variable.ty().short_name_with_generics()
        )
    }

    fn constructor(
        &self,
        visibility: Visibility,
        _class_name: &str,
        parameters: &[Parameter],
    ) -> Result<String, LanguageError> {
        Ok(format!(
            "{}constructor({})",
            visibility_prefix(visibility),
            self.parameters(parameters)
        ))
    }

    fn method(&self, signature: &MethodSignature) -> Declaration {
        let m = signature.modifiers;
        let overrides = if m.contains(Modifiers::OVERRIDE) { "override " } else { "" };
        let open = if m.contains(Modifiers::FINAL) || signature.visibility == Visibility::Private {
            ""
        } else {
            "open "
        };
        let returns = if self.is_unit(&signature.return_type) {
            String::new()
        } else {
            format!(": {}", signature.return_type.short_name_with_generics())
        };

        let decl = Declaration::line(format!(
            "{overrides}{}{open}fun {}({}){returns}",
            visibility_prefix(signature.visibility),
            signature.name,
            self.parameters(&signature.parameters)
        ));

        if m.contains(Modifiers::SYNCHRONIZED) {
            decl.annotated("@Synchronized")
        } else {
            decl
        }
    }

    fn for_header(&self, variable: &Variable, start: &Value, max: &Value, step: Option<&Value>) -> String {
        let step = match step.and_then(Value::text) {
            None | Some("1") => String::new(),
            Some(step) => format!(" step {step}"),
        };
        format!(
            "for({} in {} until {}{step})",
            variable.name(),
            start.operand_text(),
            max.operand_text()
        )
    }

    fn foreach_header(&self, variable: &Variable, iterable: &Value) -> String {
        format!("for({} in {})", variable.name(), iterable.text_or_empty())
    }

    fn class(&self, signature: &ClassSignature) -> Result<String, LanguageError> {
        let open = if signature.modifiers.contains(Modifiers::FINAL) { "" } else { "open " };

        let mut supertypes = Vec::new();
        if let Some(extends) = &signature.extends {
            supertypes.push(format!("{}()", extends.short_name_with_generics()));
        }
        supertypes.extend(signature.implements.iter().map(Type::short_name_with_generics));

        let supertypes = if supertypes.is_empty() {
            String::new()
        } else {
            format!(" : {}", supertypes.join(", "))
        };

        Ok(format!(
            "{}{open}class {}{supertypes}",
            visibility_prefix(signature.visibility),
            signature.name
        ))
    }

    fn enum_class(&self, name: &str, values: &[String]) -> Result<String, LanguageError> {
        Ok(format!("enum class {name} {{ {} }}", values.join(", ")))
    }

    fn assemble(&self, program: &Program<'_>, imports: &mut ImportScope) -> Result<String, LanguageError> {
        assemble_pipeline(self, program, imports)
    }
}
