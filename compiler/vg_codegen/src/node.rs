//! The node contract.
//!
//! A node implements [`GenNode`] with a concrete session type. The pass
//! works with [`PipelineNode`], its object-safe face, so heterogeneous
//! nodes can share one graph.

use std::any::{type_name, Any};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use vg_language::{Language, LanguageId};

use crate::{Current, GenError, GenValue, NodeRef};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GenOptions {
    /// Generate after every other node, e.g. the node returning the frame.
    pub gen_at_the_end: bool,
}

/// Session of a node without outputs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoSession;

pub trait GenNode: 'static {
    /// What generation leaves behind for consumers: output values, declared
    /// variables. Stored once per pass.
    type Session: 'static;

    fn node_ref(&self) -> NodeRef;

    fn gen_options(&self) -> GenOptions {
        GenOptions::default()
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<Self::Session, GenError>;

    /// The value on output `attribute`.
    fn output_value(
        &self,
        session: &Self::Session,
        attribute: &str,
        lang: &'static dyn Language,
    ) -> Result<GenValue, GenError>;
}

/// Type-erased [`GenNode`].
pub trait PipelineNode {
    fn reference(&self) -> NodeRef;

    fn options(&self) -> GenOptions;

    fn gen_session(&self, current: &mut Current<'_>) -> Result<Rc<dyn Any>, GenError>;

    fn output_from(&self, session: &dyn Any, attribute: &str, lang: &'static dyn Language) -> Result<GenValue, GenError>;
}

impl<N: GenNode> PipelineNode for N {
    fn reference(&self) -> NodeRef {
        self.node_ref()
    }

    fn options(&self) -> GenOptions {
        self.gen_options()
    }

    fn gen_session(&self, current: &mut Current<'_>) -> Result<Rc<dyn Any>, GenError> {
        let session: Rc<dyn Any> = Rc::new(self.gen_code(current)?);
        Ok(session)
    }

    fn output_from(&self, session: &dyn Any, attribute: &str, lang: &'static dyn Language) -> Result<GenValue, GenError> {
        let session = session
            .downcast_ref::<N::Session>()
            .ok_or_else(|| GenError::SessionType {
                node: self.node_ref(),
                expected: type_name::<N::Session>(),
            })?;
        self.output_value(session, attribute, lang)
    }
}

pub type Generator<N, S> = fn(&N, &mut Current<'_>) -> Result<S, GenError>;

/// Per-language code generators of a node `N` producing sessions `S`.
pub struct Generators<N, S> {
    generators: FxHashMap<LanguageId, Generator<N, S>>,
}

impl<N, S> Default for Generators<N, S> {
    fn default() -> Self {
        Generators {
            generators: FxHashMap::default(),
        }
    }
}

impl<N: GenNode, S> Generators<N, S> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, language: LanguageId, generator: Generator<N, S>) -> Self {
        self.generators.insert(language, generator);
        self
    }

    /// The same generator for several languages.
    #[must_use]
    pub fn with_all(mut self, languages: &[LanguageId], generator: Generator<N, S>) -> Self {
        for language in languages {
            self.generators.insert(*language, generator);
        }
        self
    }

    pub fn supports(&self, language: LanguageId) -> bool {
        self.generators.contains_key(&language)
    }

    /// Run the generator of the pass's language.
    pub fn gen(&self, node: &N, current: &mut Current<'_>) -> Result<S, GenError> {
        let language = current.language().id();
        let generator = self.generators.get(&language).ok_or_else(|| GenError::NoGenerator {
            node: node.node_ref(),
            language,
        })?;
        generator(node, current)
    }
}
