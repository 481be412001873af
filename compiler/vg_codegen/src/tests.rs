use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use vg_ir::{ColorSpace, Value, Variable};
use vg_language::types::opencv;
use vg_language::{Language, LanguageError, LanguageId};
use vg_resolve::Resolvable;

use crate::{
    build, BuildOptions, CodeGen, Current, GenError, GenNode, GenOptions, GenValue, Generators, MatValue, NoSession,
    NodeId, NodeRef, PipelineNode, Stage, Target,
};

fn options(language: LanguageId, previz: bool) -> BuildOptions {
    BuildOptions {
        class_name: Some("TestPipeline".to_string()),
        language: Some(language),
        previz,
    }
}

/// Declares a `Mat` and exposes it on `output`.
struct Source {
    id: u32,
    color: ColorSpace,
    calls: Rc<Cell<u32>>,
}

impl Source {
    fn new(id: u32) -> Rc<Self> {
        Rc::new(Source {
            id,
            color: ColorSpace::Hsv,
            calls: Rc::default(),
        })
    }
}

impl GenNode for Source {
    type Session = MatValue;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(NodeId(self.id), "Source")
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<MatValue, GenError> {
        self.calls.set(self.calls.get() + 1);
        let lang = current.language();
        let mat = Variable::new(format!("mat{}", self.id), lang.new_instance(&opencv::mat(), &[]));
        current.scope().local(&mat);
        Ok(MatValue::new(mat.as_value().clone(), self.color))
    }

    fn output_value(&self, session: &MatValue, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        match attribute {
            "output" => Ok(GenValue::Mat(session.clone())),
            _ => Err(GenError::unknown_attribute(&self.node_ref(), attribute)),
        }
    }
}

/// Streams and returns its input, after every other node.
struct Sink {
    input: Rc<dyn PipelineNode>,
}

impl GenNode for Sink {
    type Session = NoSession;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(NodeId(100), "Sink")
    }

    fn gen_options(&self) -> GenOptions {
        GenOptions { gen_at_the_end: true }
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<NoSession, GenError> {
        let node = self.node_ref();
        let mat = current.output_of(&self.input, "output")?.into_mat(&node.attribute("input"))?;
        current.stream_mat(&node, 0, &mat.value, &Resolvable::Now(mat.color))?;
        current.scope().ret(Some(mat.value));
        Ok(NoSession)
    }

    fn output_value(&self, _: &NoSession, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        Err(GenError::unknown_attribute(&self.node_ref(), attribute))
    }
}

/// Generates its peer before itself.
struct Peer {
    id: u32,
    peer: RefCell<Option<Rc<dyn PipelineNode>>>,
    calls: Cell<u32>,
}

impl GenNode for Peer {
    type Session = NoSession;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(NodeId(self.id), "Peer")
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<NoSession, GenError> {
        let peer = self.peer.borrow().clone();
        if let Some(peer) = peer {
            current.gen(&peer)?;
        }
        self.calls.set(self.calls.get() + 1);
        Ok(NoSession)
    }

    fn output_value(&self, _: &NoSession, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        Err(GenError::unknown_attribute(&self.node_ref(), attribute))
    }
}

/// Only has a JVM generator.
struct JvmOnly;

impl JvmOnly {
    fn gen_jvm(&self, current: &mut Current<'_>) -> Result<NoSession, GenError> {
        current.scope().comment("jvm");
        Ok(NoSession)
    }
}

impl GenNode for JvmOnly {
    type Session = NoSession;

    fn node_ref(&self) -> NodeRef {
        NodeRef::new(NodeId(7), "JvmOnly")
    }

    fn gen_code(&self, current: &mut Current<'_>) -> Result<NoSession, GenError> {
        Generators::new()
            .with_all(&[LanguageId::Java, LanguageId::Kotlin], Self::gen_jvm)
            .gen(self, current)
    }

    fn output_value(&self, _: &NoSession, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
        Err(GenError::unknown_attribute(&self.node_ref(), attribute))
    }
}

#[test]
fn test_gen_is_idempotent_within_a_pass() {
    let source = Source::new(1);
    let node: Rc<dyn PipelineNode> = source.clone();

    let mut codegen = CodeGen::new(&options(LanguageId::Java, false));
    let mut current = codegen.current(Target::ProcessFrame);
    assert_eq!(current.gen(&node), Ok(()));
    assert_eq!(current.gen(&node), Ok(()));
    let output = current.output_of(&node, "output");

    assert_eq!(source.calls.get(), 1);
    assert!(matches!(output, Ok(GenValue::Mat(_))));
    assert_eq!(codegen.scope(Target::ProcessFrame).stmts().len(), 1);
}

#[test]
fn test_unknown_attribute() {
    let node: Rc<dyn PipelineNode> = Source::new(2);
    let mut codegen = CodeGen::new(&options(LanguageId::Java, false));
    let mut current = codegen.current(Target::ProcessFrame);

    assert_eq!(
        current.output_of(&node, "mask"),
        Err(GenError::UnknownAttribute {
            node: NodeRef::new(NodeId(2), "Source"),
            attribute: "mask".to_string(),
        })
    );
}

#[test]
fn test_mutual_generation_terminates() {
    let a = Rc::new(Peer {
        id: 1,
        peer: RefCell::new(None),
        calls: Cell::new(0),
    });
    let b = Rc::new(Peer {
        id: 2,
        peer: RefCell::new(Some(a.clone())),
        calls: Cell::new(0),
    });
    *a.peer.borrow_mut() = Some(b.clone());

    let nodes: Vec<Rc<dyn PipelineNode>> = vec![a.clone(), b.clone()];
    let built = build(&options(LanguageId::Java, false), &nodes);

    assert!(built.is_ok());
    assert_eq!((a.calls.get(), b.calls.get()), (1, 1));

    a.peer.borrow_mut().take();
}

#[test]
fn test_end_nodes_run_last() {
    let source: Rc<dyn PipelineNode> = Source::new(1);
    let sink: Rc<dyn PipelineNode> = Rc::new(Sink { input: source.clone() });
    let other: Rc<dyn PipelineNode> = Source::new(2);

    // The sink comes first in the graph but must return after every
    // other statement.
    let build = build(&options(LanguageId::Java, false), &[sink, source, other]);
    let source = build.map(|b| b.source).unwrap_or_default();

    let mat1 = source.find("Mat mat1 = new Mat();");
    let mat2 = source.find("Mat mat2 = new Mat();");
    let ret = source.find("return mat1;");
    assert!(mat1.is_some() && mat2.is_some() && ret.is_some(), "{source}");
    assert!(mat1 < mat2 && mat2 < ret, "{source}");
}

#[test]
fn test_output_of_deferred_node_is_not_generated() {
    let source: Rc<dyn PipelineNode> = Source::new(1);
    let sink: Rc<dyn PipelineNode> = Rc::new(Sink { input: source });

    let mut codegen = CodeGen::new(&options(LanguageId::Java, false));
    let mut current = codegen.current(Target::ProcessFrame);
    assert_eq!(
        current.output_of(&sink, "anything"),
        Err(GenError::NotGenerated {
            node: NodeRef::new(NodeId(100), "Sink"),
        })
    );
}

#[test]
fn test_output_placeholder_resolves_once_generated() {
    let source: Rc<dyn PipelineNode> = Source::new(5);
    let mut codegen = CodeGen::new(&options(LanguageId::Java, false));

    let mut current = codegen.current(Target::ProcessFrame);
    let value = current.output_placeholder(&source, "output", |output| match output {
        GenValue::Mat(mat) => Some(mat.value),
        _ => None,
    });
    assert!(!value.is_now());
    current.scope().write(format!("// uses {}", value.to_text()));
    assert_eq!(current.gen(&source), Ok(()));

    let build = codegen.finish();
    let source = build.map(|b| b.source).unwrap_or_default();
    assert!(source.contains("// uses mat5"), "{source}");
}

#[test]
fn test_missing_generator() {
    let nodes: Vec<Rc<dyn PipelineNode>> = vec![Rc::new(JvmOnly)];

    assert!(build(&options(LanguageId::Kotlin, false), &nodes).is_ok());

    let err = build(&options(LanguageId::Lua, false), &nodes).err();
    assert_eq!(
        err.map(|e| (e.stage, e.error)),
        Some((
            Stage::InitialGen,
            GenError::NoGenerator {
                node: NodeRef::new(NodeId(7), "JvmOnly"),
                language: LanguageId::Lua,
            }
        ))
    );
}

#[test]
fn test_stream_mat_converts_to_rgb() {
    let source: Rc<dyn PipelineNode> = Source::new(1);
    let sink: Rc<dyn PipelineNode> = Rc::new(Sink { input: source });

    let build = build(&options(LanguageId::Java, true), &[sink]);
    let build = build.map_err(|e| e.to_string());
    let source = build.as_ref().map(|b| b.source.clone()).unwrap_or_default();

    assert!(source.contains("streamFrame(0, mat1, Imgproc.COLOR_HSV2RGB);"), "{source}");
    assert!(source.contains("import org.opencv.imgproc.Imgproc;"), "{source}");
    assert!(source.contains("extends StreamableOpenCvPipeline"), "{source}");
    assert_eq!(build.map(|b| b.unresolved), Ok(Vec::new()));
}

#[test]
fn test_stream_mat_is_a_no_op_outside_preview() {
    let source: Rc<dyn PipelineNode> = Source::new(1);
    let sink: Rc<dyn PipelineNode> = Rc::new(Sink { input: source });

    let source = build(&options(LanguageId::Java, false), &[sink])
        .map(|b| b.source)
        .unwrap_or_default();
    assert!(!source.contains("streamFrame"), "{source}");
}

#[test]
fn test_stream_mat_unsupported_backend_names_the_node() {
    let source: Rc<dyn PipelineNode> = Source::new(1);
    let sink: Rc<dyn PipelineNode> = Rc::new(Sink { input: source });

    let err = build(&options(LanguageId::Python, true), &[sink]).err();
    assert_eq!(
        err.map(|e| (e.stage, e.error)),
        Some((
            Stage::EndGen,
            GenError::Backend {
                node: Some(NodeRef::new(NodeId(100), "Sink")),
                source: LanguageError::unsupported(LanguageId::Python, "frame streaming"),
            }
        ))
    );
}

#[test]
fn test_unique_variables_and_flags() {
    let mut codegen = CodeGen::new(&options(LanguageId::Java, false));
    let mut current = codegen.current(Target::ProcessFrame);

    let first = current.unique_variable("lineColor", Value::raw("a"));
    let second = current.unique_variable("lineColor", Value::raw("b"));
    assert_eq!((first.name(), second.name()), ("lineColor", "lineColor1"));

    assert!(current.add_flag("targetsEnabled"));
    assert!(!current.add_flag("targetsEnabled"));
    assert!(current.has_flag("targetsEnabled"));
    assert_eq!(codegen.flags(), &["targetsEnabled".to_string()]);
}

#[test]
fn test_line_parameters_become_labeled_fields() {
    let mut codegen = CodeGen::new(&options(LanguageId::Java, true));
    let mut current = codegen.current(Target::ProcessFrame);
    let port = NodeRef::new(NodeId(9), "Draw").attribute("line");

    let line = GenValue::Line {
        color: crate::Scalar([0.0, 255.0, 0.0, 0.0]),
        thickness: 2,
    };
    let (color, thickness) = line.ensure_runtime_line(&mut current, &port).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!((color.text(), thickness.text()), (Some("lineColor"), Some("lineThickness")));

    let source = codegen.finish().map(|b| b.source).unwrap_or_default();
    assert!(source.contains("@Label(name = \"Line Color\")"), "{source}");
    assert!(source.contains("public Scalar lineColor = new Scalar(0.0, 255.0, 0.0, 0.0);"), "{source}");
    assert!(source.contains("public int lineThickness = 2;"), "{source}");
}

#[test]
fn test_node_error_is_recoverable_and_keeps_stage() {
    let source: Rc<dyn PipelineNode> = Source::new(1);

    struct WantsInt(Rc<dyn PipelineNode>);
    impl GenNode for WantsInt {
        type Session = NoSession;
        fn node_ref(&self) -> NodeRef {
            NodeRef::new(NodeId(3), "WantsInt")
        }
        fn gen_code(&self, current: &mut Current<'_>) -> Result<NoSession, GenError> {
            match current.output_of(&self.0, "output")? {
                GenValue::Int(_) => Ok(NoSession),
                other => Err(GenError::attribute(
                    self.node_ref().attribute("value"),
                    format!("expected Int, got {other}"),
                )),
            }
        }
        fn output_value(&self, _: &NoSession, attribute: &str, _lang: &'static dyn Language) -> Result<GenValue, GenError> {
            Err(GenError::unknown_attribute(&self.node_ref(), attribute))
        }
    }

    let nodes: Vec<Rc<dyn PipelineNode>> = vec![Rc::new(WantsInt(source))];
    let err = build(&options(LanguageId::Java, false), &nodes).err();

    assert!(err.as_ref().is_some_and(|e| e.error.is_recoverable()));
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("code generation failed during initial generation: `value` of WantsInt #3: expected Int, got Mat".to_string())
    );
}
