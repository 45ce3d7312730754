//! 渲染器 - 将元素树挂载到宿主节点

mod tree_renderer;

pub use tree_renderer::{render, render_all};
