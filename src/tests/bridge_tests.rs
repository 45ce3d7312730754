//! 脚本桥接测试

use crate::app;
use crate::config::AppConfig;
use crate::dom::Document;
use crate::js::DidactBridge;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 创建已初始化的桥接器，文档中带 `root` 挂载点
fn create_bridge() -> DidactBridge {
    let mut doc = Document::new();
    doc.create_mount("root").unwrap();
    let bridge = DidactBridge::new(Arc::new(Mutex::new(doc))).unwrap();
    bridge.init().unwrap();
    bridge
}

/// 挂载点内的标记
fn root_markup(bridge: &DidactBridge) -> String {
    let document = bridge.document();
    let doc = document.lock().unwrap();
    let root = doc.get_element_by_id("root").unwrap();
    doc.inner_markup(root)
}

#[test]
fn test_script_renders_into_document() {
    let bridge = create_bridge();
    bridge
        .eval(
            r#"
            var el = Didact.createElement(
                "div",
                { id: "x", className: "box" },
                Didact.createElement("span", null, "y"),
                42
            );
            Didact.render(el, "root");
            "#,
        )
        .unwrap();

    assert_eq!(
        root_markup(&bridge),
        r#"<div class="box" id="x"><span>y</span>42</div>"#
    );
}

#[test]
fn test_script_sees_normalized_children() {
    let bridge = create_bridge();

    let value = bridge
        .eval(r#"Didact.createElement("div", null, "a", 1).props.children[1].props.nodeValue"#)
        .unwrap();
    assert_eq!(value, "1");

    let ty = bridge
        .eval(r#"Didact.createElement("div", undefined, "a").props.children[0].type"#)
        .unwrap();
    assert_eq!(ty, "TEXT_ELEMENT");

    let text = bridge
        .eval(r#"JSON.stringify(Didact.createTextElement("hi"))"#)
        .unwrap();
    // JSON 对象键按字母序输出
    assert_eq!(text, r#"{"props":{"children":[],"nodeValue":"hi"},"type":"TEXT_ELEMENT"}"#);
}

#[test]
fn test_script_render_twice_appends() {
    let bridge = create_bridge();
    bridge
        .eval(
            r#"
            var item = Didact.createElement("li", null, "a");
            Didact.render(item, "root");
            Didact.render(item, "root");
            "#,
        )
        .unwrap();

    assert_eq!(root_markup(&bridge), "<li>a</li><li>a</li>");
}

#[test]
fn test_unknown_container_throws() {
    let bridge = create_bridge();

    let message = bridge
        .eval(
            r#"
            (function () {
                try {
                    Didact.render(Didact.createElement("p"), "nope");
                    return "rendered";
                } catch (e) {
                    return e.message;
                }
            })()
            "#,
        )
        .unwrap();

    assert_eq!(message, r#"no container with id "nope""#);
}

#[test]
fn test_console_output_captured() {
    let bridge = create_bridge();
    bridge.eval(r#"console.log("rendered", 2, "nodes")"#).unwrap();
    bridge.eval(r#"console.warn("ratio", 0.5, null, undefined)"#).unwrap();

    assert_eq!(
        bridge.take_output(),
        vec!["rendered 2 nodes".to_string(), "ratio 0.5 null undefined".to_string()]
    );
    assert!(bridge.take_output().is_empty());
}

#[test]
fn test_script_error_is_reported() {
    let bridge = create_bridge();

    let err = bridge.eval("Didact.render(").unwrap_err().to_string();
    assert!(err.contains("SyntaxError"), "{}", err);

    let err = bridge
        .eval(r#"Didact.render(Didact.createElement("p"), "missing")"#)
        .unwrap_err()
        .to_string();
    assert!(err.contains(r#"Error: no container with id "missing""#), "{}", err);
}

#[test]
fn test_element_children_keep_identity() {
    let bridge = create_bridge();

    let same = bridge
        .eval(
            r#"
            var e = Didact.createElement("span", null, "y");
            var parent = Didact.createElement("div", null, "a", e);
            parent.props.children[1] === e && parent.props.children[0].type === "TEXT_ELEMENT"
            "#,
        )
        .unwrap();
    assert_eq!(same, "true");
}

#[test]
fn test_non_json_scalars_display_like_js() {
    let bridge = create_bridge();

    let values = bridge
        .eval(
            r#"
            [
                Didact.createElement("p", null, undefined).props.children[0].props.nodeValue,
                Didact.createTextElement(NaN).props.nodeValue,
                Didact.createTextElement(-Infinity).props.nodeValue,
                Didact.createTextElement(undefined).props.nodeValue,
                typeof Didact.createTextElement(7).props.nodeValue
            ].join(",")
            "#,
        )
        .unwrap();
    assert_eq!(values, "undefined,NaN,-Infinity,undefined,number");

    bridge
        .eval(r#"Didact.render(Didact.createElement("p", null, undefined, " ", NaN), "root")"#)
        .unwrap();
    assert_eq!(root_markup(&bridge), "<p>undefined NaN</p>");
}

#[test]
fn test_plain_object_child_passes_through() {
    let bridge = create_bridge();

    let same = bridge
        .eval(
            r#"
            var obj = {};
            Didact.createElement("div", null, obj).props.children[0] === obj
            "#,
        )
        .unwrap();
    assert_eq!(same, "true");
}

#[test]
fn test_demo_config_runs_markup_and_script() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/didact.json");
    let config = AppConfig::load(&path).unwrap();
    let run = app::run(&config).unwrap();

    assert_eq!(
        run.markup(false),
        concat!(
            r#"<div id="root">"#,
            r#"<header class="top"><h1>Todo</h1></header>"#,
            r#"<ul class="todos"><li class="done">学习 Rust</li><li>完成渲染器</li><li>写测试</li></ul>"#,
            r#"<footer>3 items</footer>"#,
            r#"</div>"#
        )
    );
    assert_eq!(run.console, vec!["rendered 3 todos".to_string()]);
}
