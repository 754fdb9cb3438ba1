#[macro_use]
mod pattern;

pub mod document;
pub mod external;
pub mod formatting;
pub mod highlighting;
pub mod markup;
pub mod output;
pub mod profile;
pub mod rendering;
pub mod scanning;
pub mod sizing;
