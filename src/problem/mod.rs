// Program wide top-level error handling

mod format;

pub use format::*;
