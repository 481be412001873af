//! Program assembly shared by the JVM and Lua backends.

use vg_ir::{ClassSignature, ImportScope, MethodSignature, Modifiers, Parameter, Scope, Visibility};

use crate::types::opencv;
use crate::{valid_identifier, Language, LanguageError, Program, Renderer};

/// Assemble a pipeline with `init`, `processFrame` and `onViewportTapped`
/// entry points.
///
/// Backends that generate in a class wrap everything in a class extending
/// `OpenCvPipeline` (`StreamableOpenCvPipeline` in preview mode). The
/// others emit the same members as top-level declarations.
pub(crate) fn assemble_pipeline(
    lang: &dyn Language,
    program: &Program<'_>,
    imports: &mut ImportScope,
) -> Result<String, LanguageError> {
    tracing::debug!(language = %lang.id(), previz = program.previz, "assembling pipeline");

    let mat = opencv::mat();
    let mut body = Scope::new(1);

    if !program.class_start.is_empty() {
        body.nest(program.class_start.clone());
        body.separate();
    }

    if !program.init.is_empty() {
        let init = MethodSignature::new(Visibility::Public, lang.void_type(), "init")
            .param(Parameter::new(mat.clone(), "input"))
            .modifiers(Modifiers::OVERRIDE);
        body.method_with_body(init, program.init.clone());
        body.separate();
    }

    let process_frame = MethodSignature::new(Visibility::Public, mat.clone(), "processFrame")
        .param(Parameter::new(mat, "input"))
        .modifiers(Modifiers::OVERRIDE);
    body.method_with_body(process_frame, program.process_frame.clone());

    if !program.viewport_tapped.is_empty() {
        body.separate();
        let tapped = MethodSignature::new(Visibility::Public, lang.void_type(), "onViewportTapped")
            .modifiers(Modifiers::OVERRIDE);
        body.method_with_body(tapped, program.viewport_tapped.clone());
    }

    if !program.class_end.is_empty() {
        body.nest(program.class_end.clone());
    }

    let mut main = Scope::new(0);
    main.write(program.import_marker);
    main.separate();

    if lang.gen_in_class() {
        let base = if program.previz {
            opencv::streamable_open_cv_pipeline()
        } else {
            opencv::open_cv_pipeline()
        };
        let class = ClassSignature::new(Visibility::Public, valid_identifier(program.class_name)).extends(base);
        main.class_with_body(class, body);
    } else {
        main.nest_at(body, 0);
    }

    Renderer::new(lang, imports, program.previz).render(&main)
}
