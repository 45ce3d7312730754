//! Mini Didact 命令行：渲染标记或脚本到内存文档并输出标记

use anyhow::Result;
use mini_didact::app;
use mini_didact::config::AppConfig;
use mini_didact::{h, render, Document, NodeId};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(Path::new(&path))?,
        None => AppConfig::default(),
    };

    if config.markup.is_none() && config.script.is_none() {
        let mut document = Document::new();
        let mount = document.create_mount(&config.root_id)?;
        render_demo(&mut document, mount)?;
        println!("{}", document.outer_markup(mount));
        return Ok(());
    }

    let run = app::run(&config)?;
    for line in &run.console {
        eprintln!("[console] {}", line);
    }
    if config.pretty {
        print!("{}", run.markup(true));
    } else {
        println!("{}", run.markup(false));
    }
    Ok(())
}

/// 没有配置时渲染的内置示例
fn render_demo(document: &mut Document, mount: NodeId) -> Result<()> {
    let app = h!(
        "div",
        { "id" => "app", "className" => "container" },
        h!("h1", "Mini Didact"),
        h!(
            "ul",
            h!("li", "createElement"),
            h!("li", "createTextElement"),
            h!("li", "render")
        ),
        h!("p", "nodes: ", 3)
    );
    render(&app, document, &mount)?;
    Ok(())
}
