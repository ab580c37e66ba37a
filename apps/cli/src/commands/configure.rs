use crate::session::Session;
use anyhow::{Context, Result};
use bindery_services::{DispatchMode, ServiceManager};
use bindery_xml::{Document, Element};
use tracing::info;

const CONFIG_ROOT: &str = "server";

pub fn run(session: &Session, create: bool) -> Result<()> {
    let manager = ServiceManager::builder()
        .server(session.server.clone())
        .opt_out(session.policy.clone())
        .plugins(session.plugins()?)
        .initialize(&session.bindings)?;

    let path = session.server.config_path();
    let (mode, mut root) = if create || !path.exists() {
        (DispatchMode::Create, Element::new(CONFIG_ROOT))
    } else {
        let doc = Document::read(&path).context("Existing server configuration is unreadable")?;
        (DispatchMode::Update, doc.into_root())
    };
    info!(path = %path.display(), %mode, "Configuring server");

    let report = manager.update_configuration(&mut root, mode);
    Document::new(root).write(&path)?;

    print!("{}", manager.summary());
    println!("{mode}: {} configured, {} failed", report.applied, report.failed.len());
    for failure in &report.failed {
        println!(
            "  {} ({}): {}",
            failure.reported_type,
            failure.name.as_deref().unwrap_or("unnamed"),
            failure.message
        );
    }

    Ok(())
}
