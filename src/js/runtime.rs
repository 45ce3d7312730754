//! QuickJS 运行时

use super::BridgeError;
use rquickjs::function::Rest;
use rquickjs::{Context, Ctx, Error as JsError, Function, Runtime, Value};

/// JS 运行时
pub struct JsRuntime {
    runtime: Runtime,
    context: Context,
}

impl JsRuntime {
    pub fn new() -> Result<Self, BridgeError> {
        let runtime = Runtime::new().map_err(|e| BridgeError::Runtime(e.to_string()))?;
        let context = Context::full(&runtime).map_err(|e| BridgeError::Runtime(e.to_string()))?;

        Ok(Self { runtime, context })
    }

    /// 限制脚本堆内存（字节）
    pub fn set_memory_limit(&self, limit: usize) {
        self.runtime.set_memory_limit(limit);
    }

    /// 执行 JS 代码，返回结果的字符串形式
    ///
    /// 脚本抛出的异常带上 name、message 和调用栈。
    pub fn eval(&self, code: &str) -> Result<String, BridgeError> {
        self.context.with(|ctx| match ctx.eval::<Value, _>(code) {
            Ok(val) => Ok(js_to_string(&val)),
            Err(JsError::Exception) => Err(BridgeError::Script(describe_exception(&ctx))),
            Err(e) => Err(BridgeError::Script(e.to_string())),
        })
    }

    /// 注册全局函数，参数按 JS 字符串化后传入，返回值作为 JS 字符串
    pub fn register_function<F>(&self, name: &str, func: F) -> Result<(), BridgeError>
    where
        F: Fn(Vec<String>) -> String + 'static,
    {
        self.context.with(|ctx| {
            // 可变参数必须用 Rest 接收，Vec 会被当成单个数组参数
            let native = Function::new(ctx.clone(), move |args: Rest<Value>| -> String {
                func(args.0.iter().map(js_to_string).collect())
            })
            .map_err(|e| BridgeError::Runtime(e.to_string()))?;

            ctx.globals()
                .set(name, native)
                .map_err(|e| BridgeError::Runtime(e.to_string()))
        })
    }
}

/// 取出挂起的异常并格式化为 `Name: message` 加调用栈
fn describe_exception(ctx: &Ctx) -> String {
    let thrown = ctx.catch();
    let Some(obj) = thrown.as_object() else {
        // throw 的不是 Error 对象
        return js_to_string(&thrown);
    };

    let field = |key: &str| obj.get::<_, Option<String>>(key).ok().flatten();
    let mut text = match (field("name"), field("message")) {
        (Some(name), Some(message)) => format!("{}: {}", name, message),
        (None, Some(message)) => message,
        (Some(name), None) => name,
        (None, None) => "exception".to_string(),
    };
    if let Some(stack) = field("stack").filter(|s| !s.trim().is_empty()) {
        text.push('\n');
        text.push_str(stack.trim_end());
    }
    text
}

/// 按 JS `String(value)` 的规则转换标量，对象统一为 `[object]`
fn js_to_string(val: &Value) -> String {
    if val.is_undefined() {
        return "undefined".to_string();
    }
    if val.is_null() {
        return "null".to_string();
    }
    if let Some(s) = val.as_string() {
        return s.to_string().unwrap_or_default();
    }
    if let Some(b) = val.as_bool() {
        return b.to_string();
    }
    if let Some(n) = val.as_int() {
        return n.to_string();
    }
    match val.as_float() {
        Some(f) => format_number(f),
        None => "[object]".to_string(),
    }
}

fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
