//! Per-pass generation state.
//!
//! A [`CodeGen`] owns everything one generation pass mutates: the five
//! program scopes, node sessions, flags, the placeholder registry and the
//! import scope. Nodes never touch it directly; they receive a
//! [`Current`] bound to one target scope.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use vg_ir::{ImportScope, Scope};
use vg_language::{language, Language, LanguageId, Program};
use vg_resolve::{Placeholder, PlaceholderId, PlaceholderRegistry, PlaceholderResolver, ResolveCx};

use crate::{BuildOptions, Current, GenError, NodeId, PipelineNode};

/// Where a generation pass is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Stage {
    Creation,
    InitialGen,
    /// Nodes deferred with `gen_at_the_end` are generated.
    EndGen,
    EndedSuccess,
    EndedError,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Creation => "creation",
            Stage::InitialGen => "initial generation",
            Stage::EndGen => "end generation",
            Stage::EndedSuccess => "success",
            Stage::EndedError => "error",
        })
    }
}

/// One of the program scopes a [`Current`] appends to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Target {
    /// Instance variables, at the top of the class.
    ClassStart,
    /// Helper methods, at the bottom of the class.
    ClassEnd,
    Init,
    ProcessFrame,
    ViewportTapped,
}

/// Sessions by node, shared with output probes that outlive a borrow of the
/// pass.
pub(crate) type Sessions = Rc<RefCell<FxHashMap<NodeId, Rc<dyn Any>>>>;

/// The output of a successful pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Build {
    pub language: LanguageId,
    pub source: String,
    /// Markers that survived resolution, in order of appearance.
    pub unresolved: Vec<PlaceholderId>,
    /// Placeholder cycles detected while resolving.
    pub cycles: usize,
    /// Flags installed during the pass, in installation order.
    pub flags: Vec<String>,
}

impl Build {
    pub fn had_unresolved_markers(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

pub struct CodeGen {
    class_name: String,
    language: &'static dyn Language,
    previz: bool,
    pub(crate) stage: Stage,

    pub(crate) class_start: Scope,
    pub(crate) class_end: Scope,
    pub(crate) init: Scope,
    pub(crate) process_frame: Scope,
    pub(crate) viewport_tapped: Scope,

    pub(crate) sessions: Sessions,
    pub(crate) busy: FxHashSet<NodeId>,
    pub(crate) ending: Vec<Rc<dyn PipelineNode>>,
    pub(crate) flags: Vec<String>,
    /// Names handed out by `Current::unique_variable`.
    pub(crate) names: FxHashSet<String>,

    pub(crate) registry: PlaceholderRegistry,
    pub(crate) imports: ImportScope,
    import_marker: Placeholder<String>,
}

impl CodeGen {
    pub fn new(options: &BuildOptions) -> Self {
        let lang = language(options.language());
        let mut registry = PlaceholderRegistry::new();
        let import_marker = registry.placeholder_last(move |cx: &mut ResolveCx<'_>| {
            match lang.render_imports(cx.imports()) {
                Ok(imports) => Some(imports),
                Err(err) => {
                    tracing::warn!(error = %err, "cannot render imports");
                    None
                }
            }
        });

        CodeGen {
            class_name: options.class_name().to_string(),
            language: lang,
            previz: options.previz,
            stage: Stage::Creation,
            class_start: Scope::new(1),
            class_end: Scope::new(1),
            init: Scope::new(2),
            process_frame: Scope::new(2),
            viewport_tapped: Scope::new(2),
            sessions: Rc::default(),
            busy: FxHashSet::default(),
            ending: Vec::new(),
            flags: Vec::new(),
            names: FxHashSet::default(),
            registry,
            imports: ImportScope::new(),
            import_marker,
        }
    }

    pub fn language(&self) -> &'static dyn Language {
        self.language
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn previz(&self) -> bool {
        self.previz
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn scope(&self, target: Target) -> &Scope {
        match target {
            Target::ClassStart => &self.class_start,
            Target::ClassEnd => &self.class_end,
            Target::Init => &self.init,
            Target::ProcessFrame => &self.process_frame,
            Target::ViewportTapped => &self.viewport_tapped,
        }
    }

    pub(crate) fn scope_mut(&mut self, target: Target) -> &mut Scope {
        match target {
            Target::ClassStart => &mut self.class_start,
            Target::ClassEnd => &mut self.class_end,
            Target::Init => &mut self.init,
            Target::ProcessFrame => &mut self.process_frame,
            Target::ViewportTapped => &mut self.viewport_tapped,
        }
    }

    /// A context appending to `target`.
    pub fn current(&mut self, target: Target) -> Current<'_> {
        Current::new(self, target)
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        tracing::debug!(from = %self.stage, to = %stage, "stage change");
        self.stage = stage;
    }

    pub(crate) fn take_ending(&mut self) -> Vec<Rc<dyn PipelineNode>> {
        std::mem::take(&mut self.ending)
    }

    /// Assemble the program and resolve its placeholders.
    #[tracing::instrument(level = "debug", skip_all, fields(language = %self.language.id()))]
    pub fn finish(&mut self) -> Result<Build, GenError> {
        let marker = self.import_marker.marker();
        let program = Program {
            class_name: &self.class_name,
            previz: self.previz,
            import_marker: &marker,
            class_start: &self.class_start,
            init: &self.init,
            process_frame: &self.process_frame,
            viewport_tapped: &self.viewport_tapped,
            class_end: &self.class_end,
        };

        let text = self.language.assemble(&program, &mut self.imports)?;
        let resolution = PlaceholderResolver::new(&self.registry).resolve(&text, &mut self.imports);

        let mut source = resolution.text.trim().to_string();
        source.push('\n');

        self.set_stage(Stage::EndedSuccess);
        Ok(Build {
            language: self.language.id(),
            source,
            unresolved: resolution.unresolved,
            cycles: resolution.cycles.len(),
            flags: self.flags.clone(),
        })
    }
}

impl fmt::Debug for CodeGen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeGen")
            .field("class_name", &self.class_name)
            .field("language", &self.language.id())
            .field("previz", &self.previz)
            .field("stage", &self.stage)
            .field("flags", &self.flags)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
