//! Adapters around the external programs that render non-text blocks
//!
//! Every one of these programs is optional. Their absence is detected once
//! per process and dealt with by substituting placeholders, never by
//! failing the render.

mod diagram;
mod error;
mod graphics;
mod probe;
mod process;
mod temporary;
mod vector;

pub use diagram::{
    placeholder_svg, DiagramFormat, DiagramOptions, DiagramOutput, DiagramRenderer, DIAGRAM_TIMEOUT,
};
pub use error::{BlockError, ProcessError};
pub use graphics::{image_placeholder, is_vector, Graphic, GraphicsRenderer, Placement};
pub use probe::{dependencies, Dependencies, Probe};
pub use process::{run, Output, MAX_OUTPUT};
pub use temporary::{cleanup, content_hash, scratch, scratch_with, PREFIX};
pub use vector::{sanitize, write_vector};
