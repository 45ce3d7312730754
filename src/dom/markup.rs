//! 文档序列化为 HTML 风格的标记文本

use super::document::{Document, NodeId, NodeKind};
use crate::element::display_value;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 没有结束标签的空元素
pub fn is_void_element(tag: &str) -> bool {
    matches!(tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" |
        "link" | "meta" | "source" | "track" | "wbr"
    )
}

/// 属性名到标记属性名的映射
fn attribute_name(key: &str) -> &str {
    match key {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}

fn write_attributes(properties: &BTreeMap<String, JsonValue>, out: &mut String) {
    for (key, value) in properties {
        // 事件处理器不是可序列化的属性
        if key.starts_with("on") {
            continue;
        }
        let text = match value {
            JsonValue::Bool(false) | JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => continue,
            JsonValue::Bool(true) => {
                out.push(' ');
                out.push_str(attribute_name(key));
                continue;
            }
            other => display_value(other),
        };
        out.push(' ');
        out.push_str(attribute_name(key));
        out.push_str("=\"");
        escape_attribute(&text, out);
        out.push('"');
    }
}

impl Document {
    /// 节点自身及子树的标记
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, None, &mut out);
        out
    }

    /// 子节点的标记，不含节点自身
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, None, &mut out);
        }
        out
    }

    /// 每个节点单独一行，按深度缩进两个空格
    pub fn pretty_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, Some(0), &mut out);
        out
    }

    fn write_node(&self, id: NodeId, depth: Option<usize>, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        let child_depth = depth.map(|d| d + 1);

        match &node.kind {
            NodeKind::Document => {
                for child in &node.children {
                    self.write_node(*child, depth, out);
                }
            }
            NodeKind::Text { value } => {
                indent(depth, out);
                escape_text(value, out);
                newline(depth, out);
            }
            NodeKind::Element { tag_name, properties } => {
                indent(depth, out);
                out.push('<');
                out.push_str(tag_name);
                write_attributes(properties, out);
                out.push('>');
                newline(depth, out);
                // 空元素没有子节点时只输出开始标签
                if node.children.is_empty() && is_void_element(tag_name) {
                    return;
                }
                for child in &node.children {
                    self.write_node(*child, child_depth, out);
                }
                indent(depth, out);
                out.push_str("</");
                out.push_str(tag_name);
                out.push('>');
                newline(depth, out);
            }
        }
    }
}

fn indent(depth: Option<usize>, out: &mut String) {
    if let Some(depth) = depth {
        out.push_str(&"  ".repeat(depth));
    }
}

fn newline(depth: Option<usize>, out: &mut String) {
    if depth.is_some() {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::Document;
    use crate::host::Host;
    use serde_json::json;

    #[test]
    fn test_markup_escaping_and_attributes() {
        let mut doc = Document::new();
        let mount = doc.create_mount("root").unwrap();
        let a = doc.create_element("a").unwrap();
        doc.set_property(&a, "className", &json!("link")).unwrap();
        doc.set_property(&a, "title", &json!("say \"hi\"")).unwrap();
        doc.set_property(&a, "hidden", &json!(false)).unwrap();
        doc.set_property(&a, "draggable", &json!(true)).unwrap();
        doc.set_property(&a, "onclick", &json!("handler")).unwrap();
        doc.set_property(&a, "style", &json!({ "color": "red" })).unwrap();
        let text = doc.create_text_node("a < b & c").unwrap();
        doc.append_child(&mount, &a).unwrap();
        doc.append_child(&a, &text).unwrap();

        assert_eq!(
            doc.inner_markup(mount),
            r#"<a class="link" draggable title="say &quot;hi&quot;">a &lt; b &amp; c</a>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let mut doc = Document::new();
        let mount = doc.create_mount("root").unwrap();
        let p = doc.create_element("p").unwrap();
        let br = doc.create_element("br").unwrap();
        let input = doc.create_element("input").unwrap();
        doc.set_property(&input, "type", &json!("text")).unwrap();
        doc.append_child(&mount, &p).unwrap();
        doc.append_child(&p, &br).unwrap();
        doc.append_child(&p, &input).unwrap();

        assert_eq!(doc.inner_markup(mount), r#"<p><br><input type="text"></p>"#);
        assert_eq!(
            doc.pretty_markup(p),
            "<p>\n  <br>\n  <input type=\"text\">\n</p>\n"
        );
    }

    #[test]
    fn test_pretty_markup() {
        let mut doc = Document::new();
        let mount = doc.create_mount("root").unwrap();
        let p = doc.create_element("p").unwrap();
        let text = doc.create_text_node("hi").unwrap();
        doc.append_child(&mount, &p).unwrap();
        doc.append_child(&p, &text).unwrap();

        assert_eq!(
            doc.pretty_markup(doc.root()),
            "<div id=\"root\">\n  <p>\n    hi\n  </p>\n</div>\n"
        );
    }
}
