use std::rc::Rc;

use vg_codegen::{Current, GenError, GenNode, GenValue, Generators, MatValue, NodeId, NodeRef, PipelineNode};
use vg_ir::{ColorSpace, Modifiers, Visibility};
use vg_language::types::{opencv, python};
use vg_language::{Language, LanguageId};

use super::mat_input;

/// Converts its input to another color space.
pub struct CvtColorNode {
    id: NodeId,
    input: Rc<dyn PipelineNode>,
    target: ColorSpace,
}

impl CvtColorNode {
    pub fn new(id: NodeId, input: Rc<dyn PipelineNode>, target: ColorSpace) -> Self {
        CvtColorNode { id, input, target }
    }

    fn generators() -> Generators<Self, MatValue> {
        Generators::new()
            .with_all(&[LanguageId::Java, LanguageId::Kotlin, LanguageId::Lua], Self::gen_eocv)
            .with(LanguageId::Python, Self::gen_python)
    }

    fn input(&self, current: &mut Current<'_>) -> Result<MatValue, GenError> {
        let node = self.node_ref();
        let input = mat_input(current, &node, "input", &self.input, "output")?;
        input.require_non_binary(&node.attribute("input"))?;
        Ok(input)
    }

    fn gen_eocv(&self, current: &mut Current<'_>) -> Result<MatValue, GenError> {
        let input = self.input(current)?;
        if input.color == self.target {
            return Ok(input);
        }

        let lang = current.language();
        let name = format!("{}Mat", self.target.name().to_lowercase());
        let mat = current.unique_variable(&name, lang.new_instance(&opencv::mat(), &[]));

        current.group(|scope| {
            scope.instance_variable(Visibility::Private, &mat, None, Modifiers::empty());
        });
        current.scope().static_call(
            &opencv::imgproc(),
            "cvtColor",
            vec![
                input.value,
                mat.as_value().clone(),
                lang.cvt_color_value(input.color, self.target),
            ],
        );

        Ok(MatValue::new(mat.as_value().clone(), self.target))
    }

    fn gen_python(&self, current: &mut Current<'_>) -> Result<MatValue, GenError> {
        let input = self.input(current)?;
        if input.color == self.target {
            return Ok(input);
        }

        let lang = current.language();
        let converted = lang.static_call_value(
            &python::cv2(),
            "cvtColor",
            python::no_type(),
            &[input.value, lang.cvt_color_value(input.color, self.target)],
        );
        let mat = current.unique_variable(&self.target.name().to_lowercase(), converted);
        current.scope().local(&mat);

        Ok(MatValue::new(mat.as_value().clone(), self.target))
    }
}

impl GenNode for CvtColorNode {
    type Session = MatValue;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.id, "Convert Color")
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<MatValue, GenError> {
        Self::generators().gen(self, current)
    }

    fn output_value(&self, session: &MatValue, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        match attribute {
            "output" => Ok(GenValue::Mat(session.clone())),
            _ => Err(GenError::unknown_attribute(&self.node_ref(), attribute)),
        }
    }
}
