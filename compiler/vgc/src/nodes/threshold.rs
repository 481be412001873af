use std::rc::Rc;

use vg_codegen::{
    Current, GenError, GenNode, GenValue, Generators, MatValue, NodeId, NodeRef, PipelineNode, ScalarRange,
};
use vg_ir::{Modifiers, Value, Visibility};
use vg_language::types::{opencv, python};
use vg_language::{Language, LanguageId};

use super::mat_input;

/// Keeps the pixels whose channels all fall within a range, producing a
/// binary mask.
pub struct ThresholdNode {
    id: NodeId,
    input: Rc<dyn PipelineNode>,
    range: ScalarRange,
}

impl ThresholdNode {
    pub fn new(id: NodeId, input: Rc<dyn PipelineNode>, range: ScalarRange) -> Self {
        ThresholdNode { id, input, range }
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
        let lang = current.language();

        let lower = self.range.lower().to_value(current);
        let upper = self.range.upper().to_value(current);
        let lower = current.unique_variable("lower", lower);
        let upper = current.unique_variable("upper", upper);
        let mask = current.unique_variable(
            &format!("{}BinaryMat", input.color.name().to_lowercase()),
            lang.new_instance(&opencv::mat(), &[]),
        );

        current.group(|scope| {
            scope.instance_variable(Visibility::Public, &lower, Some("Lower"), Modifiers::empty());
            scope.instance_variable(Visibility::Public, &upper, Some("Upper"), Modifiers::empty());
        });
        current.group(|scope| {
            scope.instance_variable(Visibility::Private, &mask, None, Modifiers::empty());
        });

        current.scope().static_call(
            &opencv::core(),
            "inRange",
            vec![
                input.value,
                lower.as_value().clone(),
                upper.as_value().clone(),
                mask.as_value().clone(),
            ],
        );

        Ok(MatValue::binary(mask.as_value().clone()))
    }

    fn gen_python(&self, current: &mut Current<'_>) -> Result<MatValue, GenError> {
        let input = self.input(current)?;
        let lang = current.language();

        let tuple = |values: [f64; 4]| {
            let channels: Vec<String> = values[..usize::from(input.color.channels())]
                .iter()
                .map(|c| lang.double(*c).text_or_empty().to_string())
                .collect();
            Value::new(python::no_type(), format!("({})", channels.join(", ")))
        };
        let lower = current.unique_variable("lower", tuple(self.range.lower().0));
        let upper = current.unique_variable("upper", tuple(self.range.upper().0));

        current.group(|scope| {
            scope.instance_variable(Visibility::Public, &lower, None, Modifiers::empty());
            scope.instance_variable(Visibility::Public, &upper, None, Modifiers::empty());
        });

        let masked = lang.static_call_value(
            &python::cv2(),
            "inRange",
            python::no_type(),
            &[input.value, lower.as_value().clone(), upper.as_value().clone()],
        );
        let mask = current.unique_variable("mask", masked);
        current.scope().local(&mask);

        Ok(MatValue::binary(mask.as_value().clone()))
    }
}

impl GenNode for ThresholdNode {
    type Session = MatValue;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.id, "Color Threshold")
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
