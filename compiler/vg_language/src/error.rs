//! Backend errors.

use thiserror::Error;

use crate::LanguageId;

/// A construct the selected backend cannot express, or a bad backend name.
///
/// `Unsupported` is a programming error in node/backend pairing: the pass
/// that hits it is aborted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LanguageError {
    #[error("{construct} is not supported by the {language} backend")]
    Unsupported {
        language: LanguageId,
        construct: &'static str,
    },

    #[error("unknown language `{0}` (expected one of: java, kotlin, lua, python)")]
    UnknownLanguage(String),
}

impl LanguageError {
    pub fn unsupported(language: LanguageId, construct: &'static str) -> Self {
        LanguageError::Unsupported { language, construct }
    }
}
