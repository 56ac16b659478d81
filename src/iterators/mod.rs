//! Line, image, and joint iterators (spec §4.2).

pub mod image_iterator;
pub mod joint_iterator;
pub mod line_iterator;

pub use image_iterator::ImageIterator;
pub use joint_iterator::JointGeometry;
pub use line_iterator::LineIterator;
