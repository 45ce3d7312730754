//! Mini Didact - 声明式 UI 树构建与渲染
//! 元素工厂生成不可变的元素树，渲染器把它实体化为宿主节点

mod element;
mod host;

pub use element::{
    create_element, create_text_element, display_value, Attributes, Child, Element, Props,
    CHILDREN, NODE_VALUE, TEXT_ELEMENT,
};
pub use host::Host;

// 树渲染器
pub mod renderer;
pub use renderer::{render, render_all};

// 内存文档宿主
pub mod dom;
pub use dom::{Document, DomError, NodeId};

// 标记解析器
pub mod parser;

// JS 引擎绑定
pub mod js;

// 应用配置
pub mod config;

// 按配置运行
pub mod app;

#[doc(hidden)]
pub use serde_json;

// 单元测试
#[cfg(test)]
mod tests;
