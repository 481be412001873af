use vg_ir::ImportScope;

use super::pipeline::assemble_pipeline;
use crate::{Language, LanguageError, LanguageId, Program};

/// Java. The trait defaults are the Java spelling.
#[derive(Copy, Clone, Debug, Default)]
pub struct JavaLanguage;

impl Language for JavaLanguage {
    fn id(&self) -> LanguageId {
        LanguageId::Java
    }

    fn assemble(&self, program: &Program<'_>, imports: &mut ImportScope) -> Result<String, LanguageError> {
        assemble_pipeline(self, program, imports)
    }
}
