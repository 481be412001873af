//! The build driver: one full generation pass over a node graph.

use std::rc::Rc;

use crate::{Build, BuildError, BuildOptions, CodeGen, GenError, PipelineNode, Stage, Target};

/// Generate `nodes` in order into `processFrame`, then the nodes that asked
/// to go last, then assemble and resolve the program.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(class = options.class_name(), language = %options.language(), previz = options.previz, nodes = nodes.len())
)]
pub fn build(options: &BuildOptions, nodes: &[Rc<dyn PipelineNode>]) -> Result<Build, BuildError> {
    let mut codegen = CodeGen::new(options);

    match generate(&mut codegen, nodes).and_then(|()| codegen.finish()) {
        Ok(build) => {
            tracing::debug!(
                flags = build.flags.len(),
                unresolved = build.unresolved.len(),
                "code generation finished"
            );
            Ok(build)
        }
        Err(error) => {
            let stage = codegen.stage();
            report(stage, &error);
            codegen.set_stage(Stage::EndedError);
            Err(BuildError { stage, error })
        }
    }
}

fn generate(codegen: &mut CodeGen, nodes: &[Rc<dyn PipelineNode>]) -> Result<(), GenError> {
    codegen.set_stage(Stage::InitialGen);
    {
        let mut current = codegen.current(Target::ProcessFrame);
        for node in nodes {
            current.gen(node)?;
        }
    }

    codegen.set_stage(Stage::EndGen);
    let ending = codegen.take_ending();
    let mut current = codegen.current(Target::ProcessFrame);
    for node in &ending {
        current.gen(node)?;
    }
    Ok(())
}

fn report(stage: Stage, error: &GenError) {
    let node = error.offending_node().map(ToString::to_string);
    if error.is_recoverable() {
        tracing::warn!(%stage, node, %error, "code generation aborted");
    } else {
        tracing::error!(%stage, node, %error, "code generation failed");
    }
}
