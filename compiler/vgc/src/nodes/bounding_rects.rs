use std::rc::Rc;

use vg_codegen::{
    enable_targets, Current, GenError, GenNode, GenValue, Generators, ListElement, NodeId, NodeRef, PipelineNode,
};
use vg_ir::{Modifiers, Value, Variable, Visibility};
use vg_language::types::{java, opencv, python};
use vg_language::{quote, Language, LanguageId};

/// Bounding rect of every contour, optionally published as labeled targets.
pub struct BoundingRectsNode {
    id: NodeId,
    contours: Rc<dyn PipelineNode>,
    label: Option<String>,
}

impl BoundingRectsNode {
    pub fn new(id: NodeId, contours: Rc<dyn PipelineNode>, label: Option<String>) -> Self {
        BoundingRectsNode { id, contours, label }
    }

    fn generators() -> Generators<Self, Value> {
        Generators::new()
            .with(LanguageId::Java, Self::gen_java)
            .with(LanguageId::Python, Self::gen_python)
    }

    pub fn supports(language: LanguageId) -> bool {
        Self::generators().supports(language)
    }

    fn contours(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        let node = self.node_ref();
        current
            .output_of(&self.contours, "contours")?
            .into_runtime_list(&node.attribute("contours"), ListElement::Points)
    }

    fn gen_java(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        let node = self.node_ref();
        let contours = self.contours(current)?;
        let lang = current.language();

        let targets = match &self.label {
            Some(label) => Some((enable_targets(current, &node)?, label)),
            None => None,
        };

        let rects = current.unique_variable("rects", lang.new_instance(&java::array_list(opencv::rect()), &[]));
        current.group(|scope| {
            scope.instance_variable(Visibility::Private, &rects, None, Modifiers::empty());
        });

        let scope = current.scope();
        scope.method_call(rects.as_value(), "clear", Vec::new());

        let contour = Variable::typed(opencv::mat_of_point(), "contour");
        scope.foreach(&contour, contours, |body, contour| {
            let rect = lang.static_call_value(&opencv::imgproc(), "boundingRect", opencv::rect(), &[contour.as_value().clone()]);
            body.method_call(rects.as_value(), "add", vec![rect]);
        });

        if let Some((targets, label)) = targets {
            let index = Variable::typed(lang.int_type(), "i");
            let count = lang.method_call_value(rects.as_value(), "size", lang.int_type(), &[]);
            scope.for_loop(&index, lang.int(0), count, None, |body, index| {
                let name = Value::operation(lang.string_type(), format!("{} + {}", quote(label), index.name()));
                let rect = lang.method_call_value(rects.as_value(), "get", opencv::rect(), &[index.as_value().clone()]);
                targets.add_rect_target(body, name, rect);
            });
        }

        Ok(rects.as_value().clone())
    }

    fn gen_python(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        let contours = self.contours(current)?;

        let rects = Value::new(
            python::no_type(),
            format!("[cv2.boundingRect(contour) for contour in {}]", contours.text_or_empty()),
        )
        .with_imports([python::cv2()]);

        let rects = current.unique_variable("rects", rects);
        current.scope().local(&rects);
        Ok(rects.as_value().clone())
    }
}

impl GenNode for BoundingRectsNode {
    type Session = Value;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.id, "Bounding Rects")
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<Value, GenError> {
        Self::generators().gen(self, current)
    }

    fn output_value(&self, session: &Value, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        match attribute {
            "rects" => Ok(GenValue::RuntimeList {
                value: session.clone(),
                element: ListElement::Rect,
            }),
            _ => Err(GenError::unknown_attribute(&self.node_ref(), attribute)),
        }
    }
}
