use super::*;
use crate::types::{java, opencv, python};
use crate::{Feature, LanguageError, Program};
use pretty_assertions::assert_eq;
use vg_ir::{ImportScope, Scope, Type, Value};

fn scope_of(types: &[Type]) -> ImportScope {
    let mut imports = ImportScope::new();
    for ty in types {
        imports.import_type(ty);
    }
    imports
}

struct Scopes {
    class_start: Scope,
    init: Scope,
    process_frame: Scope,
    viewport_tapped: Scope,
    class_end: Scope,
}

impl Scopes {
    fn returning_input() -> Self {
        let mut process_frame = Scope::new(2);
        process_frame.ret(Some(Value::raw("input")));
        Scopes {
            class_start: Scope::new(1),
            init: Scope::new(2),
            process_frame,
            viewport_tapped: Scope::new(2),
            class_end: Scope::new(1),
        }
    }

    fn program(&self, previz: bool) -> Program<'_> {
        Program {
            class_name: "Test Pipeline",
            previz,
            import_marker: "<IMPORTS>",
            class_start: &self.class_start,
            init: &self.init,
            process_frame: &self.process_frame,
            viewport_tapped: &self.viewport_tapped,
            class_end: &self.class_end,
        }
    }
}

#[test]
fn test_language_lookup() {
    for id in LanguageId::ALL {
        assert_eq!(language(id).id(), id);
    }
    assert_eq!(language(LanguageId::Kotlin).source_extension(), "kt");
    assert_eq!(language(LanguageId::Python).source_extension(), "py");
}

#[test]
fn test_feature_support() {
    assert!(JAVA.supports(Feature::Classes));
    assert!(KOTLIN.supports(Feature::StreamFrame));
    assert!(LUA.supports(Feature::StreamFrame));
    assert!(!LUA.supports(Feature::Classes));
    assert!(!PYTHON.supports(Feature::StreamFrame));
    assert!(!PYTHON.supports(Feature::Constructors));
}

#[test]
fn test_java_imports_collapse_per_package() {
    let imports = scope_of(&[
        opencv::mat(),
        opencv::rect(),
        java::string(),
        opencv::point(),
        opencv::imgproc(),
        opencv::scalar(),
        opencv::size(),
    ]);

    assert_eq!(
        JAVA.render_imports(&imports),
        Ok("import org.opencv.core.*;\nimport org.opencv.imgproc.Imgproc;".to_string())
    );
}

#[test]
fn test_java_imports_below_threshold() {
    let imports = scope_of(&[opencv::mat(), opencv::imgproc(), opencv::rect()]);
    assert_eq!(
        JAVA.render_imports(&imports),
        Ok("import org.opencv.core.Mat;\nimport org.opencv.core.Rect;\nimport org.opencv.imgproc.Imgproc;".to_string())
    );
}

#[test]
fn test_kotlin_excludes_unit() {
    let imports = scope_of(&[crate::types::kotlin::unit(), opencv::mat()]);
    assert_eq!(
        KOTLIN.render_imports(&imports),
        Ok("import org.opencv.core.Mat".to_string())
    );
}

#[test]
fn test_lua_imports() {
    let imports = scope_of(&[opencv::mat()]);
    let text = LUA.render_imports(&imports).unwrap_or_default();
    assert!(text.starts_with("Mat = java.import('org.opencv.core.Mat')\nfunction forEachSmart(array, func)"));
    assert_eq!(
        LUA.import_declaration("a", "B"),
        Err(LanguageError::unsupported(LanguageId::Lua, "import declaration"))
    );
}

#[test]
fn test_python_imports() {
    let imports = scope_of(&[python::cv2(), python::nd_array(), python::cv2()]);
    assert_eq!(
        PYTHON.render_imports(&imports),
        Ok("import cv2\nimport numpy as np".to_string())
    );

    let grouped = scope_of(&[
        python::module("collections", Some("deque")),
        python::module("collections", Some("OrderedDict")),
    ]);
    assert_eq!(
        PYTHON.render_imports(&grouped),
        Ok("from collections import deque, OrderedDict".to_string())
    );
}

#[test]
fn test_java_assembly() {
    let scopes = Scopes::returning_input();
    let mut imports = ImportScope::new();
    let text = JAVA.assemble(&scopes.program(false), &mut imports);

    assert_eq!(
        text,
        Ok("<IMPORTS>\n\npublic class Test_Pipeline extends OpenCvPipeline {\n\t@Override\n\tpublic Mat processFrame(Mat input) {\n\t\treturn input;\n\t}\n}\n".to_string())
    );
    assert_eq!(imports.types(), &[opencv::open_cv_pipeline(), opencv::mat()]);
}

#[test]
fn test_java_assembly_previz_and_optional_methods() {
    let mut scopes = Scopes::returning_input();
    scopes.init.call("setup", vec![]);
    scopes.class_end.comment("end");

    let mut imports = ImportScope::new();
    let text = JAVA.assemble(&scopes.program(true), &mut imports).unwrap_or_default();

    assert!(text.contains("extends StreamableOpenCvPipeline {"));
    assert!(text.contains("\t@Override\n\tpublic void init(Mat input) {\n\t\tsetup();\n\t}\n\n\t@Override\n\tpublic Mat processFrame"));
    assert!(text.ends_with("\t}\n\n\t// end\n}\n"));
    assert!(imports.contains(&opencv::streamable_open_cv_pipeline()));
}

#[test]
fn test_kotlin_assembly() {
    let scopes = Scopes::returning_input();
    let mut imports = ImportScope::new();
    let text = KOTLIN.assemble(&scopes.program(false), &mut imports);

    assert_eq!(
        text,
        Ok("<IMPORTS>\n\nopen class Test_Pipeline : OpenCvPipeline() {\n\toverride open fun processFrame(input: Mat): Mat {\n\t\treturn input\n\t}\n}\n".to_string())
    );
}

#[test]
fn test_lua_assembly() {
    let scopes = Scopes::returning_input();
    let mut imports = ImportScope::new();
    let text = LUA.assemble(&scopes.program(false), &mut imports);

    assert_eq!(
        text,
        Ok("<IMPORTS>\n\nfunction processFrame(input)\n\treturn input\nend\n".to_string())
    );
}

#[test]
fn test_python_assembly() {
    let mut scopes = Scopes::returning_input();
    scopes.class_start.comment("state");

    let mut imports = ImportScope::new();
    let text = PYTHON.assemble(&scopes.program(false), &mut imports);

    assert_eq!(
        text,
        Ok("<IMPORTS>\n\n# state\n\ndef runPipeline(input, llrobot):\n\treturn input\n".to_string())
    );
}

#[test]
fn test_stream_frame() {
    let id = Value::raw("0");
    let mat = Value::raw("hsv");
    assert_eq!(
        JAVA.stream_frame(&id, &mat, None),
        Ok("streamFrame(0, hsv, null);".to_string())
    );
    assert_eq!(
        LUA.stream_frame(&id, &mat, None),
        Ok("stream(0, hsv, nil)".to_string())
    );
    assert!(PYTHON.stream_frame(&id, &mat, None).is_err());
}

#[test]
fn test_python_helpers() {
    let a = Value::raw("a");
    let b = Value::raw("b");
    assert_eq!(PYTHON.tuple(&[a.clone(), b.clone()]).text(), Some("(a, b)"));
    assert_eq!(PYTHON.named_argument("k", &a).text(), Some("k=a"));
    assert_eq!(PYTHON.slice(Some(&a), None, Some(&b)).text(), Some("a::b"));
}
