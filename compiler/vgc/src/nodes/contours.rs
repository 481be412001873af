use std::rc::Rc;

use vg_codegen::{Current, GenError, GenNode, GenValue, Generators, ListElement, NodeId, NodeRef, PipelineNode};
use vg_ir::{Modifiers, Value, Visibility};
use vg_language::types::{java, opencv, python};
use vg_language::{Language, LanguageId};

use super::mat_input;

/// Finds the outer contours of a binary mask.
pub struct FindContoursNode {
    id: NodeId,
    input: Rc<dyn PipelineNode>,
}

impl FindContoursNode {
    pub fn new(id: NodeId, input: Rc<dyn PipelineNode>) -> Self {
        FindContoursNode { id, input }
    }

    fn generators() -> Generators<Self, Value> {
        Generators::new()
            .with_all(&[LanguageId::Java, LanguageId::Kotlin, LanguageId::Lua], Self::gen_eocv)
            .with(LanguageId::Python, Self::gen_python)
    }

    fn mask(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        let node = self.node_ref();
        let mask = mat_input(current, &node, "input", &self.input, "output")?;
        mask.require_binary(&node.attribute("input"))?;
        Ok(mask.value)
    }

    fn gen_eocv(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        let mask = self.mask(current)?;
        let lang = current.language();

        let contours = current.unique_variable(
            "contours",
            lang.new_instance(&java::array_list(opencv::mat_of_point()), &[]),
        );
        let hierarchy = current.unique_variable("hierarchy", lang.new_instance(&opencv::mat(), &[]));

        current.group(|scope| {
            scope.instance_variable(Visibility::Private, &contours, None, Modifiers::empty());
            scope.instance_variable(Visibility::Private, &hierarchy, None, Modifiers::empty());
        });

        let scope = current.scope();
        scope.method_call(contours.as_value(), "clear", Vec::new());
        scope.method_call(hierarchy.as_value(), "release", Vec::new());
        scope.static_call(
            &opencv::imgproc(),
            "findContours",
            vec![
                mask,
                contours.as_value().clone(),
                hierarchy.as_value().clone(),
                opencv::retr_external(),
                opencv::chain_approx_simple(),
            ],
        );

        Ok(contours.as_value().clone())
    }

    fn gen_python(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        let mask = self.mask(current)?;
        let lang = current.language();

        // cv2 returns (contours, hierarchy).
        let found = lang.static_call_value(
            &python::cv2(),
            "findContours",
            python::no_type(),
            &[mask, python::retr_external(), python::chain_approx_simple()],
        );
        let first = Value::new(python::no_type(), format!("{}[0]", found.text_or_empty())).with_imports_of([&found]);

        let contours = current.unique_variable("contours", first);
        current.scope().local(&contours);
        Ok(contours.as_value().clone())
    }
}

impl GenNode for FindContoursNode {
    type Session = Value;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.id, "Find Contours")
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        Self::generators().gen(self, current)
    }

    fn output_value(&self, session: &Value, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        match attribute {
            "contours" => Ok(GenValue::RuntimeList {
                value: session.clone(),
                element: ListElement::Points,
            }),
            _ => Err(GenError::unknown_attribute(&self.node_ref(), attribute)),
        }
    }
}
