//! Styling vocabulary shared by the highlighter and the markup engines

mod syntax;

pub use syntax::*;
