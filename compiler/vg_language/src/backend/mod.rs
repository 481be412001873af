//! Backend singletons.

mod java;
mod kotlin;
mod lua;
mod pipeline;
pub mod python;

pub use java::JavaLanguage;
pub use kotlin::KotlinLanguage;
pub use lua::LuaLanguage;
pub use python::PythonLanguage;

use crate::{Language, LanguageId};

pub static JAVA: JavaLanguage = JavaLanguage;
pub static KOTLIN: KotlinLanguage = KotlinLanguage;
pub static LUA: LuaLanguage = LuaLanguage;
pub static PYTHON: PythonLanguage = PythonLanguage;

/// The backend for `id`.
pub fn language(id: LanguageId) -> &'static dyn Language {
    match id {
        LanguageId::Java => &JAVA,
        LanguageId::Kotlin => &KOTLIN,
        LanguageId::Lua => &LUA,
        LanguageId::Python => &PYTHON,
    }
}

#[cfg(test)]
mod tests;
