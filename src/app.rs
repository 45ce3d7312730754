//! 应用运行：按配置渲染标记和脚本到同一个文档

use crate::config::AppConfig;
use crate::dom::{Document, NodeId};
use crate::js::DidactBridge;
use crate::parser::MarkupParser;
use crate::renderer::render_all;
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};

/// 一次运行的结果
pub struct AppRun {
    pub document: Document,
    pub mount: NodeId,
    /// 脚本 console 输出
    pub console: Vec<String>,
}

impl AppRun {
    pub fn markup(&self, pretty: bool) -> String {
        if pretty {
            self.document.pretty_markup(self.mount)
        } else {
            self.document.outer_markup(self.mount)
        }
    }
}

/// 挂载 `rootId`，先渲染标记文件，再执行脚本
pub fn run(config: &AppConfig) -> Result<AppRun> {
    let mut document = Document::new();
    let mount = document
        .create_mount(&config.root_id)
        .with_context(|| format!("failed to mount #{}", config.root_id))?;

    if let Some(path) = &config.markup {
        let source = AppConfig::read_source(path)?;
        let roots = MarkupParser::new(&source)
            .parse()
            .with_context(|| format!("failed to parse {}", path.display()))?;
        log::info!("parsed {} root element(s) from {}", roots.len(), path.display());
        render_all(&roots, &mut document, &mount)?;
    }

    let mut console = Vec::new();
    if let Some(path) = &config.script {
        let source = AppConfig::read_source(path)?;
        let bridge = DidactBridge::new(Arc::new(Mutex::new(document)))?;
        if let Some(limit) = config.script_memory_limit {
            bridge.runtime().set_memory_limit(limit);
        }
        bridge.init()?;
        bridge
            .eval(&source)
            .with_context(|| format!("script {} failed", path.display()))?;
        console = bridge.take_output();

        let shared = bridge.document();
        let guard = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        document = guard.clone();
    }

    Ok(AppRun {
        document,
        mount,
        console,
    })
}
