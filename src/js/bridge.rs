//! JS 与 Native 桥接层 - 向脚本暴露 Didact 全局对象

use super::JsRuntime;
use crate::dom::{Document, DomError};
use crate::element::{create_element, create_text_element, Attributes, Child, Element};
use crate::renderer::render;
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("js runtime: {0}")]
    Runtime(String),
    #[error("script error: {0}")]
    Script(String),
    #[error("invalid element json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("render failed: {0}")]
    Render(#[from] DomError),
    #[error("no container with id {0:?}")]
    UnknownContainer(String),
}

/// 脚本侧的 Didact API，参数经 JSON 交给 native 实现
const PRELUDE: &str = r#"
var console = {
    log: function () {
        __native_print(Array.prototype.slice.call(arguments).map(String).join(' '));
    }
};
console.error = console.log;
console.warn = console.log;

function __didact_call(reply) {
    var r = JSON.parse(reply);
    if (r.error !== undefined) {
        throw new Error(r.error);
    }
    return r.ok;
}

function __didact_json(value) {
    return JSON.stringify(value === undefined ? null : value);
}

// JSON 表示不了的标量（undefined、NaN、Infinity、symbol 等）按 String() 传递
function __didact_scalar(value) {
    if (typeof value === "string" || typeof value === "boolean") {
        return value;
    }
    if (typeof value === "number" && isFinite(value)) {
        return value;
    }
    return String(value);
}

var Didact = {
    createElement: function (type, props) {
        var children = Array.prototype.slice.call(arguments, 2);
        // 对象子节点只有元素形状的才交给 native 解码，其余先占位
        var transport = children.map(function (child) {
            if (typeof child !== "object") {
                return __didact_scalar(child);
            }
            return child !== null && typeof child.type === "string" ? child : null;
        });
        var element = __didact_call(__native_create_element(String(type), __didact_json(props), JSON.stringify(transport)));
        // 对象子节点原样放回，保持引用相同
        children.forEach(function (child, i) {
            if (typeof child === "object") {
                element.props.children[i] = child;
            }
        });
        return element;
    },
    createTextElement: function (text) {
        return __didact_call(__native_create_text_element(JSON.stringify(__didact_scalar(text))));
    },
    render: function (element, containerId) {
        __didact_call(__native_render(__didact_json(element), String(containerId)));
    }
};
"#;

/// Didact 桥接器
pub struct DidactBridge {
    runtime: JsRuntime,
    document: Arc<Mutex<Document>>,
    output: Arc<Mutex<Vec<String>>>,
}

impl DidactBridge {
    pub fn new(document: Arc<Mutex<Document>>) -> Result<Self, BridgeError> {
        Ok(Self {
            runtime: JsRuntime::new()?,
            document,
            output: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// 注册 native 函数并安装 Didact 全局对象
    pub fn init(&self) -> Result<(), BridgeError> {
        log::debug!("register didact natives");
        self.register_print_function()?;
        self.register_factory_functions()?;
        self.register_render_function()?;
        self.runtime.eval(PRELUDE)?;
        Ok(())
    }

    pub fn runtime(&self) -> &JsRuntime {
        &self.runtime
    }

    pub fn eval(&self, code: &str) -> Result<String, BridgeError> {
        self.runtime.eval(code)
    }

    /// 取出并清空 console 输出
    pub fn take_output(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.output))
    }

    pub fn document(&self) -> Arc<Mutex<Document>> {
        self.document.clone()
    }

    fn register_print_function(&self) -> Result<(), BridgeError> {
        let output = self.output.clone();
        self.runtime.register_function("__native_print", move |args| {
            lock(&output).push(args.join(" "));
            "undefined".to_string()
        })
    }

    fn register_factory_functions(&self) -> Result<(), BridgeError> {
        self.runtime.register_function("__native_create_element", |args| {
            reply(create_element_json(&args))
        })?;

        self.runtime.register_function("__native_create_text_element", |args| {
            reply(parse_arg(args.first()).and_then(|text| {
                Ok(serde_json::to_value(create_text_element(text))?)
            }))
        })
    }

    fn register_render_function(&self) -> Result<(), BridgeError> {
        let document = self.document.clone();
        self.runtime.register_function("__native_render", move |args| {
            reply(render_json(&document, &args).map(|()| JsonValue::Null))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// native 返回值统一包装为 `{"ok": ..}` 或 `{"error": ..}`
fn reply(result: Result<JsonValue, BridgeError>) -> String {
    let wrapped = match result {
        Ok(value) => json!({ "ok": value }),
        Err(e) => {
            log::debug!("bridge call failed: {}", e);
            json!({ "error": e.to_string() })
        }
    };
    wrapped.to_string()
}

fn parse_arg(arg: Option<&String>) -> Result<JsonValue, BridgeError> {
    match arg.map(String::as_str) {
        None | Some("undefined") => Ok(JsonValue::Null),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

fn create_element_json(args: &[String]) -> Result<JsonValue, BridgeError> {
    let ty = args.first().cloned().unwrap_or_default();

    // 非对象的 props 按空属性表处理
    let attributes: Attributes = match parse_arg(args.get(1))? {
        JsonValue::Object(map) => map.into_iter().collect(),
        _ => Attributes::new(),
    };

    let children = match parse_arg(args.get(2))? {
        JsonValue::Array(items) => items
            .into_iter()
            .map(Child::from_json)
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(serde_json::to_value(create_element(ty, Some(attributes), children))?)
}

fn render_json(document: &Mutex<Document>, args: &[String]) -> Result<(), BridgeError> {
    let element: Element = serde_json::from_value(parse_arg(args.first())?)?;
    let container_id = args.get(1).cloned().unwrap_or_default();

    let mut doc = lock(document);
    let container = doc
        .get_element_by_id(&container_id)
        .ok_or(BridgeError::UnknownContainer(container_id))?;
    render(&element, &mut *doc, &container)?;
    Ok(())
}
