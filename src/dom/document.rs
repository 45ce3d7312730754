//! 内存文档 - 基于 arena 的宿主节点树

use crate::element::{display_value, NODE_VALUE};
use crate::host::Host;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// 节点 ID，即节点在 arena 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// 节点类型
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Element {
        tag_name: String,
        properties: BTreeMap<String, JsonValue>,
    },
    Text {
        value: String,
    },
}

/// 文档节点
#[derive(Debug, Clone)]
pub struct DomNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl DomNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomError {
    #[error("invalid tag name {0:?}")]
    InvalidTagName(String),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("cannot append {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("property {key:?} is read-only on {node:?}")]
    ReadOnlyProperty { node: NodeId, key: String },
}

/// 内存文档
///
/// 节点只增不删，`NodeId` 在文档生命周期内一直有效。
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<DomNode>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![DomNode::new(NodeKind::Document)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// 在文档根下创建挂载点 `<div id=..>`
    pub fn create_mount(&mut self, id: &str) -> Result<NodeId, DomError> {
        let mount = Host::create_element(self, "div")?;
        self.set_property(&mount, "id", &JsonValue::String(id.to_string()))?;
        let root = self.root();
        self.append_child(&root, &mount)?;
        Ok(mount)
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut DomNode, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    pub fn property(&self, id: NodeId, key: &str) -> Option<&JsonValue> {
        match &self.node(id)?.kind {
            NodeKind::Element { properties, .. } => properties.get(key),
            _ => None,
        }
    }

    /// 子树中所有文本节点按文档顺序拼接
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        if let NodeKind::Text { value } = &node.kind {
            out.push_str(value);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    /// 先序查找 `id` 属性匹配的元素
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find(self.root(), &|doc: &Document, node: NodeId| {
            doc.property(node, "id").and_then(|v| v.as_str()) == Some(id)
        })
    }

    fn find(&self, from: NodeId, pred: &dyn Fn(&Document, NodeId) -> bool) -> Option<NodeId> {
        if pred(self, from) {
            return Some(from);
        }
        self.children(from)
            .iter()
            .find_map(|child| self.find(*child, pred))
    }

    /// 子孙节点数量（不含自身）
    pub fn descendant_count(&self, id: NodeId) -> usize {
        self.children(id)
            .iter()
            .map(|child| 1 + self.descendant_count(*child))
            .sum()
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(DomNode::new(kind));
        NodeId(self.nodes.len() - 1)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':' || c == '.')
}

impl Host for Document {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        if !is_valid_tag_name(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }
        Ok(self.push(NodeKind::Element {
            tag_name: tag.to_string(),
            properties: BTreeMap::new(),
        }))
    }

    fn create_text_node(&mut self, text: &str) -> Result<NodeId, DomError> {
        Ok(self.push(NodeKind::Text {
            value: text.to_string(),
        }))
    }

    /// 追加子节点；子节点已有父节点时先从原位置移除
    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let (parent, child) = (*parent, *child);
        let parent_node = self.node(parent).ok_or(DomError::UnknownNode(parent))?;
        if parent_node.is_text() || self.node(child).is_none() {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if child == self.root() || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.parent(child) {
            self.node_mut(old_parent)?.children.retain(|c| *c != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn set_property(&mut self, node: &NodeId, key: &str, value: &JsonValue) -> Result<(), DomError> {
        let id = *node;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element { properties, .. } => {
                properties.insert(key.to_string(), value.clone());
                Ok(())
            }
            NodeKind::Text { value: text } if key == NODE_VALUE => {
                *text = display_value(value);
                Ok(())
            }
            _ => Err(DomError::ReadOnlyProperty {
                node: id,
                key: key.to_string(),
            }),
        }
    }
}
