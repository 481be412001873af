//! Semantic type descriptors.
//!
//! A [`Type`] names a type in the *target* language: a short name, the
//! package (or Python module) it lives in, and its generic arguments. Types
//! are the join key of the whole model: import scopes deduplicate on them and
//! backends compare against them to pick number widening rules.

use std::fmt;
use std::hash::{Hash, Hasher};

/// When a type requires an import statement.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ImportRule {
    /// Import when the package is non-empty and differs from the name.
    ///
    /// Primitives are modelled with `package == name` (`int`/`int`) so they
    /// never produce an import.
    #[default]
    Auto,
    /// Never import (implicitly visible types such as `java.lang.Math`).
    Never,
    /// Import whenever a package is set, even if it equals the name
    /// (Python modules like `cv2`).
    Always,
}

/// A type in the target language.
///
/// Equality and hashing are structural over `(name, package, generics)`;
/// the import override, array flag and import rule do not participate.
#[derive(Clone, Debug)]
pub struct Type {
    name: String,
    package: String,
    generics: Vec<Type>,
    import_override: Option<Box<Type>>,
    is_array: bool,
    import_rule: ImportRule,
}

impl Type {
    /// Create a type living in `package`.
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Type {
            name: name.into(),
            package: package.into(),
            generics: Vec::new(),
            import_override: None,
            is_array: false,
            import_rule: ImportRule::Auto,
        }
    }

    /// Create a builtin type that never needs an import.
    pub fn primitive(name: impl Into<String>) -> Self {
        let name = name.into();
        Type::new(name.clone(), name)
    }

    /// The empty type, used for untyped text values.
    pub fn none() -> Self {
        Type::new("", "")
    }

    /// Attach generic arguments.
    #[must_use]
    pub fn with_generics(mut self, generics: impl IntoIterator<Item = Type>) -> Self {
        self.generics = generics.into_iter().collect();
        self
    }

    /// Import `target` instead of this type when this type is used.
    #[must_use]
    pub fn importing(mut self, target: Type) -> Self {
        self.import_override = Some(Box::new(target));
        self
    }

    /// Mark this type as an array type.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    #[must_use]
    pub fn with_import_rule(mut self, rule: ImportRule) -> Self {
        self.import_rule = rule;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[inline]
    pub fn generics(&self) -> &[Type] {
        &self.generics
    }

    #[inline]
    pub fn has_generics(&self) -> bool {
        !self.generics.is_empty()
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_none(&self) -> bool {
        self.name.is_empty() && self.package.is_empty()
    }

    /// The type that is actually imported when this type is used.
    ///
    /// Follows the override chain to its end.
    pub fn import_target(&self) -> &Type {
        let mut current = self;
        while let Some(next) = &current.import_override {
            current = next;
        }
        current
    }

    /// Whether using this type requires an import statement.
    pub fn should_import(&self) -> bool {
        match self.import_rule {
            ImportRule::Never => false,
            ImportRule::Always => !self.package.is_empty(),
            ImportRule::Auto => !self.package.is_empty() && self.package != self.name,
        }
    }

    /// Short name followed by the generic arguments, e.g. `HashMap<String, Rect>`.
    pub fn short_name_with_generics(&self) -> String {
        if self.generics.is_empty() {
            return self.name.clone();
        }

        let args: Vec<String> = self
            .generics
            .iter()
            .map(Type::short_name_with_generics)
            .collect();
        format!("{}<{}>", self.name, args.join(", "))
    }

    /// Fully qualified name (`org.opencv.core.Mat`), or the bare name when
    /// the package is empty or equal to the name.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() || self.package == self.name {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.package == other.package && self.generics == other.generics
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.package.hash(state);
        self.generics.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name_with_generics())
    }
}
