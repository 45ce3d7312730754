//! 元素工厂 - 构建描述 UI 树的不可变元素

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 文本元素的类型标记
pub const TEXT_ELEMENT: &str = "TEXT_ELEMENT";

/// 文本元素存放内容的属性名
pub const NODE_VALUE: &str = "nodeValue";

/// 保留属性名，存放子元素
pub const CHILDREN: &str = "children";

/// 属性表（不含 children）
pub type Attributes = BTreeMap<String, JsonValue>;

/// 元素属性
///
/// 序列化时与 JS 对象同形：所有属性平铺，`children` 为保留键。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Props {
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<Element>,
}

/// 元素：类型 + 属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub props: Props,
}

impl Element {
    pub fn is_text(&self) -> bool {
        self.ty == TEXT_ELEMENT
    }

    pub fn children(&self) -> &[Element] {
        &self.props.children
    }

    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.props.attributes.get(key)
    }

    /// 文本元素的内容，非文本元素返回 None
    pub fn node_value(&self) -> Option<&JsonValue> {
        if self.is_text() {
            self.attribute(NODE_VALUE)
        } else {
            None
        }
    }
}

/// 子节点：已经是元素，或者是需要包装的标量
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(Element),
    Text(JsonValue),
}

impl Child {
    /// 从 JSON 值还原子节点，对象按元素解码，其余按标量处理
    pub fn from_json(value: JsonValue) -> Result<Self, serde_json::Error> {
        match value {
            JsonValue::Object(_) => Ok(Child::Node(serde_json::from_value(value)?)),
            scalar => Ok(Child::Text(scalar)),
        }
    }

    pub fn into_element(self) -> Element {
        match self {
            Child::Node(element) => element,
            Child::Text(text) => create_text_element(text),
        }
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Node(element)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(JsonValue::String(text.to_string()))
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(JsonValue::String(text))
    }
}

macro_rules! impl_scalar_child {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Child {
                fn from(value: $t) -> Self {
                    Child::Text(JsonValue::from(value))
                }
            }
        )*
    };
}

impl_scalar_child!(i32, i64, u32, u64, usize, f32, f64, bool);

/// 创建元素
///
/// `props` 为空时按空属性表处理；props 里自带的 `children` 会被规范化后的子节点覆盖。
/// 标量子节点被包装为文本元素，元素子节点原样保留。
pub fn create_element<T>(ty: T, props: Option<Attributes>, children: Vec<Child>) -> Element
where
    T: Into<String>,
{
    let mut attributes = props.unwrap_or_default();
    attributes.remove(CHILDREN);

    Element {
        ty: ty.into(),
        props: Props {
            attributes,
            children: children.into_iter().map(Child::into_element).collect(),
        },
    }
}

/// 创建文本元素
pub fn create_text_element<V>(text: V) -> Element
where
    V: Into<JsonValue>,
{
    let mut attributes = Attributes::new();
    attributes.insert(NODE_VALUE.to_string(), text.into());

    Element {
        ty: TEXT_ELEMENT.to_string(),
        props: Props {
            attributes,
            children: Vec::new(),
        },
    }
}

/// 标量按宿主显示文本的方式转为字符串
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => match n.as_f64() {
            // 整数值的浮点数不带小数部分显示
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// 声明式构建元素
///
/// ```
/// use mini_didact::h;
///
/// let el = h!("div", { "id" => "x" }, h!("span", "y"));
/// assert_eq!(el.children()[0].ty, "span");
/// ```
#[macro_export]
macro_rules! h {
    ($ty:expr) => {
        $crate::create_element($ty, None, ::std::vec::Vec::new())
    };
    ($ty:expr, { $($key:expr => $value:expr),* $(,)? } $(, $child:expr)* $(,)?) => {
        $crate::create_element(
            $ty,
            Some(
                [$((::std::string::ToString::to_string(&$key), $crate::serde_json::json!($value))),*]
                    .into_iter()
                    .collect(),
            ),
            vec![$($crate::Child::from($child)),*],
        )
    };
    ($ty:expr $(, $child:expr)* $(,)?) => {
        $crate::create_element($ty, None, vec![$($crate::Child::from($child)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("hi")), "hi");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(2.0)), "2");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&JsonValue::Null), "null");
    }

    #[test]
    fn test_child_from_json() {
        let child = Child::from_json(json!({ "type": "p", "props": { "children": [] } })).unwrap();
        assert!(matches!(child, Child::Node(ref el) if el.ty == "p"));

        let child = Child::from_json(json!(7)).unwrap();
        assert_eq!(child, Child::Text(json!(7)));

        assert!(Child::from_json(json!({ "props": {} })).is_err());
    }
}
