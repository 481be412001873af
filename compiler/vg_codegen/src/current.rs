//! The context nodes generate against.

use std::rc::Rc;

use vg_ir::{ColorSpace, Scope, Type, Value, Variable};
use vg_language::{Feature, Language, LanguageError};
use vg_resolve::{IntoResolved, PlaceholderRegistry, Resolvable, ResolveCx};

use crate::{CodeGen, GenError, GenValue, NodeRef, PipelineNode, Stage, Target};

/// A generation pass bound to one target scope.
///
/// Everything a node does goes through here: appending statements,
/// declaring instance variables, generating its inputs and reading their
/// outputs, registering placeholders.
pub struct Current<'a> {
    codegen: &'a mut CodeGen,
    target: Target,
}

impl<'a> Current<'a> {
    pub(crate) fn new(codegen: &'a mut CodeGen, target: Target) -> Self {
        Current { codegen, target }
    }

    pub fn language(&self) -> &'static dyn Language {
        self.codegen.language()
    }

    pub fn previz(&self) -> bool {
        self.codegen.previz()
    }

    pub fn stage(&self) -> Stage {
        self.codegen.stage()
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// The scope this context appends to.
    pub fn scope(&mut self) -> &mut Scope {
        self.codegen.scope_mut(self.target)
    }

    pub fn class_start(&mut self) -> &mut Scope {
        self.codegen.scope_mut(Target::ClassStart)
    }

    pub fn class_end(&mut self) -> &mut Scope {
        self.codegen.scope_mut(Target::ClassEnd)
    }

    pub fn init(&mut self) -> &mut Scope {
        self.codegen.scope_mut(Target::Init)
    }

    pub fn process_frame(&mut self) -> &mut Scope {
        self.codegen.scope_mut(Target::ProcessFrame)
    }

    pub fn viewport_tapped(&mut self) -> &mut Scope {
        self.codegen.scope_mut(Target::ViewportTapped)
    }

    /// Run `f` with a context bound to another scope of the same pass.
    pub fn with_target<R>(&mut self, target: Target, f: impl FnOnce(&mut Current<'_>) -> R) -> R {
        let mut other = Current::new(&mut *self.codegen, target);
        f(&mut other)
    }

    pub fn registry(&mut self) -> &mut PlaceholderRegistry {
        &mut self.codegen.registry
    }

    /// Import `ty` regardless of whether any rendered value mentions it.
    pub fn import_type(&mut self, ty: &Type) {
        self.codegen.imports.import_type(ty);
    }

    /// Install `flag`; `true` the first time within the pass.
    pub fn add_flag(&mut self, flag: &str) -> bool {
        if self.has_flag(flag) {
            return false;
        }
        tracing::debug!(flag, "installed flag");
        self.codegen.flags.push(flag.to_string());
        true
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.codegen.flags.iter().any(|f| f == flag)
    }

    /// A variable named after `name` that no other caller of this method
    /// and no class-level declaration uses.
    pub fn unique_variable(&mut self, name: &str, initial: Value) -> Variable {
        let mut candidate = name.to_string();
        let mut count = 1usize;
        while self.codegen.names.contains(&candidate) || self.codegen.class_start.declares(&candidate) {
            candidate = format!("{name}{count}");
            count += 1;
        }
        self.codegen.names.insert(candidate.clone());
        Variable::new(candidate, initial)
    }

    /// Append a group of class-level declarations, separated from the
    /// previous group by a blank line.
    pub fn group(&mut self, build: impl FnOnce(&mut Scope)) {
        self.class_start().group(build);
    }

    /// Declare an enum at the end of the class.
    pub fn enum_decl(&mut self, name: &str, values: &[&str]) {
        self.class_end().enum_decl(name, values);
    }

    /// Fail with a backend error against `node` unless the active language
    /// supports `feature`.
    pub fn require(&self, node: &NodeRef, feature: Feature) -> Result<(), GenError> {
        let lang = self.language();
        if lang.supports(feature) {
            return Ok(());
        }
        Err(GenError::Backend {
            node: Some(node.clone()),
            source: LanguageError::unsupported(lang.id(), feature.construct()),
        })
    }

    /// Stream `mat` to the preview under `id`, converting it to RGB first
    /// when `color` is anything else. A no-op outside preview mode.
    pub fn stream_mat(
        &mut self,
        node: &NodeRef,
        id: i64,
        mat: &Value,
        color: &Resolvable<ColorSpace>,
    ) -> Result<(), GenError> {
        if !self.previz() {
            return Ok(());
        }
        self.require(node, Feature::StreamFrame)?;

        let lang = self.language();
        let registry = &mut self.codegen.registry;
        let conversion = registry.dependent(color, move |color| {
            if color == ColorSpace::Rgb {
                Value::none()
            } else {
                lang.cvt_color_value(color, ColorSpace::Rgb)
            }
        });

        let id = lang.int(id);
        let mat = mat.clone();
        let call = registry.placeholder(move |cx: &mut ResolveCx<'_>| {
            let conversion = conversion.resolve(cx)?;
            let conversion = (!conversion.is_none()).then_some(conversion);
            match lang.stream_frame(&id, &mat, conversion.as_ref()) {
                Ok(text) => Some(Value::raw(text).with_imports_of(conversion.as_ref())),
                Err(err) => {
                    tracing::warn!(error = %err, "cannot render stream call");
                    None
                }
            }
        });

        self.scope().write(call.marker());
        Ok(())
    }

    /// Generate `node` unless it already was in this pass.
    ///
    /// A node marked `gen_at_the_end` is queued until the end stage. A
    /// node reached again while its own generation is running is skipped,
    /// so cyclic graphs terminate.
    pub fn gen(&mut self, node: &Rc<dyn PipelineNode>) -> Result<(), GenError> {
        let node_ref = node.reference();
        let id = node_ref.id;

        if node.options().gen_at_the_end && self.codegen.stage != Stage::EndGen {
            if !self.codegen.ending.iter().any(|n| n.reference().id == id) {
                tracing::debug!(node = %node_ref, "deferred to the end stage");
                self.codegen.ending.push(Rc::clone(node));
            }
            return Ok(());
        }

        if self.codegen.sessions.borrow().contains_key(&id) {
            return Ok(());
        }
        if !self.codegen.busy.insert(id) {
            tracing::debug!(node = %node_ref, "already being generated, skipping");
            return Ok(());
        }

        tracing::debug!(node = %node_ref, target = ?self.target, "generating");
        let result = node.gen_session(self);
        self.codegen.busy.remove(&id);

        let session = result?;
        self.codegen.sessions.borrow_mut().insert(id, session);
        Ok(())
    }

    /// Generate `node` and read one of its outputs.
    pub fn output_of(&mut self, node: &Rc<dyn PipelineNode>, attribute: &str) -> Result<GenValue, GenError> {
        self.gen(node)?;

        let id = node.reference().id;
        let session = self.codegen.sessions.borrow().get(&id).cloned();
        let session = session.ok_or_else(|| GenError::NotGenerated { node: node.reference() })?;
        node.output_from(session.as_ref(), attribute, self.language())
    }

    /// An output of `node` that may not exist yet, e.g. because the node is
    /// generated at the end of the pass. `extract` maps the output to the
    /// value the caller needs; the output is read again on every resolution
    /// attempt until it exists.
    pub fn output_placeholder<T, F>(
        &mut self,
        node: &Rc<dyn PipelineNode>,
        attribute: &str,
        extract: F,
    ) -> Resolvable<T>
    where
        T: IntoResolved + 'static,
        F: Fn(GenValue) -> Option<T> + 'static,
    {
        let sessions = Rc::clone(&self.codegen.sessions);
        let node = Rc::clone(node);
        let attribute = attribute.to_string();
        let lang = self.language();

        self.codegen.registry.from_value(move || {
            let id = node.reference().id;
            let session = sessions.borrow().get(&id).cloned()?;
            node.output_from(session.as_ref(), &attribute, lang).ok().and_then(&extract)
        })
    }

    /// The session `node` produced in this pass, if any.
    pub fn session_of<S: 'static>(&self, node: &NodeRef) -> Option<Rc<S>> {
        let session = self.codegen.sessions.borrow().get(&node.id).cloned()?;
        session.downcast::<S>().ok()
    }
}
