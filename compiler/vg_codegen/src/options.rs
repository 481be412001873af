//! Options of a generation pass.

use thiserror::Error;
use vg_language::{LanguageError, LanguageId};

/// Class name used when none is given.
pub const DEFAULT_CLASS_NAME: &str = "VisionPipeline";

/// Settings of one generation pass. Independent of each other, so they can
/// be layered: defaults, then a config source, then command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Name of the generated class (--class=<Name>)
    pub class_name: Option<String>,
    /// Target language (--lang=<java|kotlin|lua|python>)
    pub language: Option<LanguageId>,
    /// Generate for live preview (--previz)
    pub previz: bool,
}

impl BuildOptions {
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or(DEFAULT_CLASS_NAME)
    }

    pub fn language(&self) -> LanguageId {
        self.language.unwrap_or(LanguageId::Java)
    }

    /// Layer `other` on top of `self`: set options win, flags accumulate.
    pub fn merge(&mut self, other: &Self) {
        if other.class_name.is_some() {
            self.class_name.clone_from(&other.class_name);
        }
        if other.language.is_some() {
            self.language = other.language;
        }
        self.previz |= other.previz;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("invalid --lang: {0}")]
    Language(#[from] LanguageError),
    #[error("--class needs a non-empty name")]
    EmptyClassName,
}

/// Parse the generation flags out of `args`. Anything else is left for the
/// caller.
pub fn parse_build_options(args: &[String]) -> Result<BuildOptions, OptionsError> {
    let mut options = BuildOptions::default();

    for arg in args {
        if let Some(lang) = arg.strip_prefix("--lang=") {
            options.language = Some(lang.parse()?);
        } else if let Some(name) = arg.strip_prefix("--class=") {
            if name.trim().is_empty() {
                return Err(OptionsError::EmptyClassName);
            }
            options.class_name = Some(name.to_string());
        } else if arg == "--previz" {
            options.previz = true;
        }
    }

    Ok(options)
}
