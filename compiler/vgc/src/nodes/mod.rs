//! Built-in demonstration nodes.
//!
//! Enough of a vision pipeline to exercise every part of a pass: a source,
//! a color conversion, a threshold producing a binary mask, contour
//! detection, labeled bounding-rect targets and an output node generated
//! at the end.

mod bounding_rects;
mod contours;
mod cvt_color;
mod input;
mod output;
mod threshold;

use std::rc::Rc;

use vg_codegen::{BuildOptions, Current, GenError, MatValue, NodeId, NodeRef, PipelineNode, Range, ScalarRange};
use vg_ir::ColorSpace;

pub use bounding_rects::BoundingRectsNode;
pub use contours::FindContoursNode;
pub use cvt_color::CvtColorNode;
pub use input::InputNode;
pub use output::OutputNode;
pub use threshold::ThresholdNode;

/// Read the `Mat` on output `attribute` of `from` for input `port` of `node`.
pub(crate) fn mat_input(
    current: &mut Current<'_>,
    node: &NodeRef,
    port: &str,
    from: &Rc<dyn PipelineNode>,
    attribute: &str,
) -> Result<MatValue, GenError> {
    current.output_of(from, attribute)?.into_mat(&node.attribute(port))
}

/// The demonstration graph: detect the bounding rects of yellow blobs.
///
/// Nodes are listed out of order on purpose; each pulls in what it reads,
/// and the output goes last regardless of its position.
pub fn demo_graph(options: &BuildOptions) -> Vec<Rc<dyn PipelineNode>> {
    let input: Rc<dyn PipelineNode> = Rc::new(InputNode::new(NodeId(0)));
    let hsv: Rc<dyn PipelineNode> = Rc::new(CvtColorNode::new(NodeId(1), input, ColorSpace::Hsv));
    let mask: Rc<dyn PipelineNode> = Rc::new(ThresholdNode::new(
        NodeId(2),
        Rc::clone(&hsv),
        ScalarRange([
            Range::new(20.0, 32.0),
            Range::new(100.0, 255.0),
            Range::new(100.0, 255.0),
            Range::ZERO,
        ]),
    ));
    let contours: Rc<dyn PipelineNode> = Rc::new(FindContoursNode::new(NodeId(3), mask));
    let output: Rc<dyn PipelineNode> = Rc::new(OutputNode::new(NodeId(5), hsv));

    let last: Rc<dyn PipelineNode> = if BoundingRectsNode::supports(options.language()) {
        Rc::new(BoundingRectsNode::new(NodeId(4), contours, Some("yellow".to_string())))
    } else {
        contours
    };

    vec![output, last]
}
