use vg_codegen::{Current, GenError, GenNode, GenValue, MatValue, NodeId, NodeRef};
use vg_ir::{ColorSpace, Value};
use vg_language::types::{opencv, python};
use vg_language::{Language, LanguageId};

/// The camera frame passed to the pipeline.
pub struct InputNode {
    id: NodeId,
}

impl InputNode {
    pub fn new(id: NodeId) -> Self {
        InputNode { id }
    }
}

impl GenNode for InputNode {
    type Session = MatValue;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.id, "Pipeline Input")
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<MatValue, GenError> {
        // Frames arrive as RGBA on EOCV targets and as BGR from cv2.
        Ok(match current.language().id() {
            LanguageId::Python => MatValue::new(Value::new(python::no_type(), "input"), ColorSpace::Bgr),
            _ => MatValue::new(Value::new(opencv::mat(), "input"), ColorSpace::Rgba),
        })
    }

    fn output_value(&self, session: &MatValue, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        match attribute {
            "output" => Ok(GenValue::Mat(session.clone())),
            _ => Err(GenError::unknown_attribute(&self.node_ref(), attribute)),
        }
    }
}
