//! 宿主节点系统接口

use serde_json::Value as JsonValue;

/// 渲染器依赖的宿主能力：按类型建节点、建文本节点、追加子节点、设置属性
///
/// 宿主返回的错误原样向上传递，渲染器不做转换也不回滚已追加的节点。
pub trait Host {
    /// 宿主节点句柄
    type Node: Clone;
    type Error;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    fn create_text_node(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    fn set_property(
        &mut self,
        node: &Self::Node,
        key: &str,
        value: &JsonValue,
    ) -> Result<(), Self::Error>;
}
