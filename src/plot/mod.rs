//! Cursor picking on plotted data.
//!
//! Curves are searched by x alone when their samples are ordered, or by
//! Euclidean distance when they are parametric. Images map the cursor to the
//! nearest pixel and slice the array through it.

mod curve;
mod image;

pub use curve::{nearest_among, nearest_on_curve, CurveCursor, CurvePick, Series};
pub use image::{cross_sections, nearest_on_image, CrossSections, ImageCursor, ImageFrame, Trace};
