//! OpenCV Java bindings and pipeline base classes (JVM and Lua targets).

use vg_ir::{Type, Value};

pub fn open_cv_pipeline() -> Type {
    Type::new("OpenCvPipeline", "org.openftc.easyopencv")
}

pub fn streamable_open_cv_pipeline() -> Type {
    Type::new("StreamableOpenCvPipeline", "io.github.deltacv.eocvsim.pipeline")
}

pub fn imgproc() -> Type {
    Type::new("Imgproc", "org.opencv.imgproc")
}

pub fn core() -> Type {
    Type::new("Core", "org.opencv.core")
}

pub fn cv_type() -> Type {
    Type::new("CvType", "org.opencv.core")
}

pub fn mat() -> Type {
    Type::new("Mat", "org.opencv.core")
}

pub fn mat_of_int() -> Type {
    Type::new("MatOfInt", "org.opencv.core")
}

pub fn mat_of_point() -> Type {
    Type::new("MatOfPoint", "org.opencv.core")
}

pub fn mat_of_point2f() -> Type {
    Type::new("MatOfPoint2f", "org.opencv.core")
}

pub fn size() -> Type {
    Type::new("Size", "org.opencv.core")
}

pub fn scalar() -> Type {
    Type::new("Scalar", "org.opencv.core")
}

pub fn rect() -> Type {
    Type::new("Rect", "org.opencv.core")
}

pub fn rotated_rect() -> Type {
    Type::new("RotatedRect", "org.opencv.core")
}

pub fn point() -> Type {
    Type::new("Point", "org.opencv.core")
}

fn imgproc_constant(name: &str) -> Value {
    Value::new(super::int(), format!("Imgproc.{name}")).with_imports([imgproc()])
}

pub fn retr_list() -> Value {
    imgproc_constant("RETR_LIST")
}

pub fn retr_external() -> Value {
    imgproc_constant("RETR_EXTERNAL")
}

pub fn chain_approx_simple() -> Value {
    imgproc_constant("CHAIN_APPROX_SIMPLE")
}

pub fn morph_rect() -> Value {
    imgproc_constant("MORPH_RECT")
}
