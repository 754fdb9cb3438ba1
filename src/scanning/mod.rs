//! Splitting a document into runs of text and the blocks between them
//!
//! The scanner is shared by every output target. What differs between
//! targets is the Surface (how text and graphics are rendered) and the Sink
//! (where the rendered segments go).

mod lines;
mod lookahead;
mod scanner;
mod surface;

pub use lines::{container_start, fence, image_reference, vector_start, Container, Fence, ImageReference, VectorStart};
pub use lookahead::{find_vector_block, VectorBlock};
pub use scanner::{ScanOptions, Scanner, State, CONTAINER_WINDOW, DIAGRAM_MARKER, LOOKAHEAD};
pub use surface::{Segment, Sink, Surface};
