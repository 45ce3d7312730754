//! 树渲染器 - 深度优先把元素树实体化为宿主节点

use crate::element::{display_value, Element, NODE_VALUE};
use crate::host::Host;

/// 渲染元素到容器
///
/// 每次调用都完整构建一棵新树并追加到 `container` 下，不与之前的渲染结果比对。
/// 同一元素渲染两次会得到两份并列的节点。
pub fn render<H>(element: &Element, host: &mut H, container: &H::Node) -> Result<(), H::Error>
where
    H: Host + ?Sized,
{
    if element.is_text() {
        let text = element
            .props
            .attributes
            .get(NODE_VALUE)
            .map(display_value)
            .unwrap_or_default();
        log::trace!("text node {:?}", text);
        let node = host.create_text_node(&text)?;
        return host.append_child(container, &node);
    }

    log::trace!("element <{}>", element.ty);
    let node = host.create_element(&element.ty)?;
    // 先挂到父节点，子节点再挂到新节点上
    host.append_child(container, &node)?;

    for (key, value) in &element.props.attributes {
        host.set_property(&node, key, value)?;
    }

    for child in &element.props.children {
        render(child, host, &node)?;
    }

    Ok(())
}

/// 按顺序渲染多个根元素到同一个容器
pub fn render_all<'a, H, I>(elements: I, host: &mut H, container: &H::Node) -> Result<(), H::Error>
where
    H: Host + ?Sized,
    I: IntoIterator<Item = &'a Element>,
{
    for element in elements {
        render(element, host, container)?;
    }
    Ok(())
}
