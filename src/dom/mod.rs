//! 内存文档宿主

mod document;
mod markup;

pub use document::{Document, DomError, DomNode, NodeId, NodeKind};
pub use markup::is_void_element;
