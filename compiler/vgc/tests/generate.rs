#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

//! End-to-end generation of the demonstration graph.

use pretty_assertions::assert_eq;
use vg_codegen::{build, BuildOptions, Stage, TARGETS_FLAG};
use vg_language::LanguageId;
use vgc::nodes::demo_graph;

fn options(language: LanguageId, previz: bool) -> BuildOptions {
    BuildOptions {
        class_name: None,
        language: Some(language),
        previz,
    }
}

fn generate(language: LanguageId, previz: bool) -> String {
    let options = options(language, previz);
    let build = build(&options, &demo_graph(&options)).expect("demo graph generates");
    assert!(!build.had_unresolved_markers(), "{}", build.source);
    assert!(!build.source.contains("<@vg#"), "{}", build.source);
    build.source
}

/// Asserts `needles` occur in `source` in the given order.
fn assert_in_order(source: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match source[from..].find(needle) {
            Some(at) => from += at + needle.len(),
            None => panic!("`{needle}` missing or out of order in:\n{source}"),
        }
    }
}

#[test]
fn java_pipeline() {
    let source = generate(LanguageId::Java, false);

    assert_in_order(
        &source,
        &[
            "import ",
            "public class VisionPipeline extends OpenCvPipeline {",
            "private Mat hsvMat = new Mat();",
            "public Scalar lower = new Scalar(20.0, 100.0, 100.0, 0.0);",
            "public Scalar upper = new Scalar(32.0, 255.0, 255.0, 0.0);",
            "private Mat hsvBinaryMat = new Mat();",
            "public Mat processFrame(Mat input) {",
            "Imgproc.cvtColor(input, hsvMat, Imgproc.COLOR_RGB2HSV);",
            "Core.inRange(hsvMat, lower, upper, hsvBinaryMat);",
            "contours.clear();",
            "Imgproc.findContours(hsvBinaryMat, contours, hierarchy, Imgproc.RETR_EXTERNAL, Imgproc.CHAIN_APPROX_SIMPLE);",
            "clearTargets();",
            "rects.clear();",
            "rects.add(Imgproc.boundingRect(contour));",
            "addRectTarget(\"yellow\" + i, rects.get(i));",
            "return hsvMat;",
            "private synchronized void clearTargets() {",
            "public synchronized List<Rect> getRectTargets(String label) {",
        ],
    );

    // Labels only exist in preview mode.
    assert!(!source.contains("@Label"), "{source}");
    assert!(!source.contains("streamFrame"), "{source}");
}

#[test]
fn java_preview_streams_and_labels() {
    let source = generate(LanguageId::Java, true);

    assert!(source.contains("extends StreamableOpenCvPipeline"), "{source}");
    assert!(source.contains("@Label(name = \"Lower\")"), "{source}");
    assert_in_order(
        &source,
        &["streamFrame(0, hsvMat, Imgproc.COLOR_HSV2RGB);", "return hsvMat;"],
    );
}

#[test]
fn targets_flag_reported() {
    let options = options(LanguageId::Java, false);
    let build = build(&options, &demo_graph(&options)).unwrap();
    assert_eq!(build.flags, vec![TARGETS_FLAG.to_string()]);
    assert_eq!(build.cycles, 0);
}

#[test]
fn kotlin_pipeline() {
    let source = generate(LanguageId::Kotlin, false);

    assert!(source.contains("Imgproc.cvtColor(input, hsvMat, Imgproc.COLOR_RGB2HSV)"), "{source}");
    assert!(source.contains("Core.inRange(hsvMat, lower, upper, hsvBinaryMat)"), "{source}");
    assert!(!source.contains("addRectTarget"), "{source}");
    assert!(!source.contains(';'), "{source}");
}

#[test]
fn python_pipeline() {
    let source = generate(LanguageId::Python, false);

    assert_in_order(
        &source,
        &[
            "import cv2",
            "lower = (20.0, 100.0, 100.0)",
            "upper = (32.0, 255.0, 255.0)",
            "def runPipeline(input, llrobot)",
            "hsv = cv2.cvtColor(input, cv2.COLOR_BGR2HSV)",
            "mask = cv2.inRange(hsv, lower, upper)",
            "contours = cv2.findContours(mask, cv2.RETR_EXTERNAL, cv2.CHAIN_APPROX_SIMPLE)[0]",
            "rects = [cv2.boundingRect(contour) for contour in contours]",
            "return [], hsv, []",
        ],
    );
}

#[test]
fn python_has_no_preview() {
    let options = options(LanguageId::Python, true);
    let err = build(&options, &demo_graph(&options)).unwrap_err();

    assert_eq!(err.stage, Stage::EndGen);
    assert!(!err.error.is_recoverable());
    assert_eq!(
        err.error.offending_node().map(|node| node.name.as_str()),
        Some("Pipeline Output")
    );
}

#[test]
fn lua_pipeline() {
    let source = generate(LanguageId::Lua, false);

    assert!(source.contains("Imgproc"), "{source}");
    assert!(source.contains("hsvBinaryMat"), "{source}");
    assert!(!source.contains("class "), "{source}");
}
