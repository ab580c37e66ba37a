use crate::session::Session;
use anyhow::Result;
use bindery_domain::constants::LIBRARY_EXTENSION;
use bindery_services::{BindingRegistry, installed_libraries};

pub fn run(session: &Session) -> Result<()> {
    let registry = BindingRegistry::parse(&session.bindings, &session.policy, &session.plugins()?)?;

    print!("{}", registry.summary());

    let mut features: Vec<_> = registry.required_features().into_iter().collect();
    features.sort_unstable();
    println!("extensions: {}", if registry.requires_extensions() { "required" } else { "not required" });
    println!("features: {}", list(&features));

    let mut components = Vec::new();
    registry.required_components(&session.uris, &mut components);
    println!("components: {}", list(&components));

    let installed = installed_libraries(&session.server.library_path(), LIBRARY_EXTENSION)?;
    let urls = registry.required_client_library_urls(&installed, &session.uris);
    println!("client libraries: {}", list(&urls));

    Ok(())
}

fn list(items: &[String]) -> String {
    if items.is_empty() { "-".to_owned() } else { items.join(", ") }
}
