use std::rc::Rc;

use vg_codegen::{Current, GenError, GenNode, GenOptions, GenValue, NoSession, NodeId, NodeRef, PipelineNode};
use vg_ir::Value;
use vg_language::types::python;
use vg_language::{Language, LanguageId};
use vg_resolve::Resolvable;

use super::mat_input;

/// Shows its input in the preview and returns it from the pipeline.
pub struct OutputNode {
    id: NodeId,
    input: Rc<dyn PipelineNode>,
}

impl OutputNode {
    pub fn new(id: NodeId, input: Rc<dyn PipelineNode>) -> Self {
        OutputNode { id, input }
    }
}

impl GenNode for OutputNode {
    type Session = NoSession;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.id, "Pipeline Output")
    }

    fn gen_options(&self) -> GenOptions {
        GenOptions { gen_at_the_end: true }
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<NoSession, GenError> {
        let node = self.node_ref();
        let mat = mat_input(current, &node, "input", &self.input, "output")?;

        current.stream_mat(&node, 0, &mat.value, &Resolvable::Now(mat.color))?;

        let returned = match current.language().id() {
            // Limelight expects (largest contour, image, robot data).
            LanguageId::Python => Value::new(python::no_type(), format!("[], {}, []", mat.value.text_or_empty())),
            _ => mat.value,
        };
        current.scope().ret(Some(returned));
        Ok(NoSession)
    }

    fn output_value(&self, _: &NoSession, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        Err(GenError::unknown_attribute(&self.node_ref(), attribute))
    }
}
