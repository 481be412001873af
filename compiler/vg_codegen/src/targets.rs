//! Labeled detection targets on JVM pipelines.
//!
//! Nodes that detect rectangles can publish them under a label so the
//! host program can query them. The first such node installs two maps and
//! their accessors in the pipeline class; every frame starts by clearing
//! them.

use vg_ir::{MethodSignature, Modifiers, Parameter, Scope, Type, Value, Variable, Visibility};
use vg_language::types::{java, opencv};
use vg_language::{Feature, Language};

use crate::{Current, GenError, NodeRef};

/// Flag installed by the first node that enables targets.
pub const TARGETS_FLAG: &str = "targetsEnabled";

/// Proof that the target maps and accessors exist in this pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Targets(());

impl Targets {
    pub fn add_rect_target(self, scope: &mut Scope, label: Value, rect: Value) {
        scope.call("addRectTarget", vec![label, rect]);
    }

    pub fn add_rot_rect_target(self, scope: &mut Scope, label: Value, rect: Value) {
        scope.call("addRotRectTarget", vec![label, rect]);
    }
}

/// Install target support, once per pass.
pub fn enable_targets(current: &mut Current<'_>, node: &NodeRef) -> Result<Targets, GenError> {
    current.require(node, Feature::Classes)?;
    if !current.add_flag(TARGETS_FLAG) {
        return Ok(Targets(()));
    }

    let lang = current.language();
    let rect_targets = Variable::new(
        "rectTargets",
        lang.new_instance(&java::hash_map(lang.string_type(), opencv::rect()), &[]),
    );
    let rot_rect_targets = Variable::new(
        "rotRectTargets",
        lang.new_instance(&java::hash_map(lang.string_type(), opencv::rotated_rect()), &[]),
    );

    current.scope().call("clearTargets", Vec::new());

    current.group(|scope| {
        scope.instance_variable(Visibility::Private, &rect_targets, None, Modifiers::empty());
        scope.instance_variable(Visibility::Private, &rot_rect_targets, None, Modifiers::empty());
    });

    let class_end = current.class_end();
    let synchronized = Modifiers::SYNCHRONIZED;

    class_end.method(
        MethodSignature::new(Visibility::Private, lang.void_type(), "clearTargets").modifiers(synchronized),
        |body| {
            body.method_call(rect_targets.as_value(), "clear", Vec::new());
            body.method_call(rot_rect_targets.as_value(), "clear", Vec::new());
        },
    );

    add_method(lang, class_end, "addRectTarget", &rect_targets, opencv::rect(), "rect");
    add_method(lang, class_end, "addRotRectTarget", &rot_rect_targets, opencv::rotated_rect(), "rotRect");

    get_methods(lang, class_end, "RectTarget", &rect_targets, &opencv::rect());
    get_methods(lang, class_end, "RotRectTarget", &rot_rect_targets, &opencv::rotated_rect());

    tracing::debug!(node = %node, "enabled targets");
    Ok(Targets(()))
}

fn add_method(lang: &dyn Language, scope: &mut Scope, name: &str, map: &Variable, ty: Type, param: &str) {
    let label = Parameter::new(lang.string_type(), "label");
    let target = Parameter::new(ty, param);

    let signature = MethodSignature::new(Visibility::Private, lang.void_type(), name)
        .param(label.clone())
        .param(target.clone())
        .modifiers(Modifiers::SYNCHRONIZED);

    scope.method(signature, |body| {
        body.method_call(
            map.as_value(),
            "put",
            vec![label.as_value().clone(), target.as_value().clone()],
        );
    });
}

/// `get<Kind>(label)` returning the exact match and `get<Kind>s(label)`
/// returning every target whose label starts with `label`.
fn get_methods(lang: &dyn Language, scope: &mut Scope, kind: &str, map: &Variable, ty: &Type) {
    let label = Parameter::new(lang.string_type(), "label");

    let single = MethodSignature::new(Visibility::Public, ty.clone(), format!("get{kind}"))
        .param(label.clone())
        .modifiers(Modifiers::SYNCHRONIZED);
    scope.method(single, |body| {
        let found = lang.method_call_value(map.as_value(), "get", ty.clone(), &[label.as_value().clone()]);
        body.ret(Some(lang.cast(&found, ty)));
    });

    let all = MethodSignature::new(Visibility::Public, java::list(ty.clone()), format!("get{kind}s"))
        .param(label.clone())
        .modifiers(Modifiers::SYNCHRONIZED);
    scope.method(all, |body| {
        let targets = Variable::new("targets", lang.new_instance(&java::array_list(ty.clone()), &[]));
        body.local(&targets);

        let entry = Variable::typed(java::map_entry(lang.string_type(), ty.clone()), "namedTarget");
        let entries = lang.method_call_value(map.as_value(), "entrySet", java::set(entry.ty().clone()), &[]);

        body.foreach(&entry, entries, |body, entry| {
            let key = lang.method_call_value(entry.as_value(), "getKey", lang.string_type(), &[]);
            let matches = lang.method_call_value(&key, "startsWith", lang.boolean_type(), &[label.as_value().clone()]);
            let value = lang.method_call_value(entry.as_value(), "getValue", ty.clone(), &[]);

            body.if_block(matches, |body| {
                body.method_call(targets.as_value(), "add", vec![value]);
            });
        });

        body.ret(Some(targets.as_value().clone()));
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vg_language::LanguageId;

    use super::*;
    use crate::{BuildOptions, CodeGen, NodeId, Target};

    fn codegen(language: LanguageId) -> CodeGen {
        CodeGen::new(&BuildOptions {
            language: Some(language),
            ..BuildOptions::default()
        })
    }

    #[test]
    fn test_installed_once_per_pass() {
        let mut codegen = codegen(LanguageId::Java);
        let node = NodeRef::new(NodeId(1), "Bounding Rects");

        let mut current = codegen.current(Target::ProcessFrame);
        assert!(enable_targets(&mut current, &node).is_ok());
        assert!(enable_targets(&mut current, &node).is_ok());

        assert_eq!(codegen.flags(), &[TARGETS_FLAG.to_string()]);
        // Two maps, declared once.
        assert_eq!(codegen.scope(Target::ClassStart).stmts().len(), 2);
        // clearTargets, two adders, two getters per map.
        assert_eq!(codegen.scope(Target::ClassEnd).stmts().len(), 7);
        assert_eq!(codegen.scope(Target::ProcessFrame).stmts().len(), 1);
    }

    #[test]
    fn test_requires_classes() {
        let mut codegen = codegen(LanguageId::Python);
        let node = NodeRef::new(NodeId(4), "Bounding Rects");

        let mut current = codegen.current(Target::ProcessFrame);
        let err = enable_targets(&mut current, &node).err();
        assert_eq!(err.as_ref().and_then(GenError::offending_node), Some(&node));
        assert!(codegen.flags().is_empty());
    }
}
