//! 标记解析器

pub mod markup;

pub use markup::{MarkupParser, ParseError};
