use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tabgate_app::{build_facade, init_tracing, AppConfig};
use tabgate_core::mock_host::{app, folder, link, site, MockHost};
use tabgate_core::{GateError, GateEvent};
use tracing::{info, warn};

const DEFAULT_CONFIG: &str = "tabgate-app/config/tabgate.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = AppConfig::load(&config_path)?;
    init_tracing(&config.log_filter());

    let host = Arc::new(demo_host());
    let facade = build_facade(&config, host.clone()).await?;

    let mut events = facade.events().subscribe();
    let listener = tokio::spawn(async move {
        while let Ok(envelope) = events.recv().await {
            match envelope.event {
                GateEvent::CapabilityAdded(names) => println!("[event #{}] granted {:?}", envelope.sequence, names),
                GateEvent::CapabilityRemoved(names) => println!("[event #{}] revoked {:?}", envelope.sequence, names),
                GateEvent::ApplicationUninstalled => println!("[event #{}] application uninstalled", envelope.sequence),
            }
        }
    });

    let grants = facade.registry().get_all().await?;
    println!("Capabilities: {}", serde_json::to_string(&grants)?);

    match facade.list_applications().await {
        Err(GateError::PermissionDenied(name)) => warn!("Apps hidden until '{}' is granted", name),
        other => info!("Unexpected result before grant: {:?}", other.map(|apps| apps.len())),
    }

    host.grant(&["management", "bookmarks", "topSites"]);

    for app in facade.list_applications().await? {
        println!("App: {} ({})", app.name, app.id);
    }
    facade.launch_application("docs").await?;
    facade.uninstall_application("sheets").await?;

    for bookmark in facade.fetch_bookmarks_bar(Some(3)).await? {
        println!("Bookmark: {} -> {}", bookmark.title, bookmark.url.unwrap_or_default());
    }
    for top in facade.fetch_top_sites().await? {
        println!("Top site: {} -> {}", top.title, top.url);
    }

    facade.save_setting(json!({"theme": "dark", "columns": 4})).await?;
    println!("Settings: {}", serde_json::Value::Object(facade.get_setting("theme").await?));

    facade.registry().revoke(&"topSites".into()).await?;

    let snapshot = facade.metrics().snapshot();
    println!(
        "Host calls: {}, failures: {}, denials: {}, events: {}",
        snapshot.host_calls, snapshot.host_failures, snapshot.permission_denials, snapshot.events_published
    );

    facade.shutdown();
    drop(facade);
    listener.await?;
    Ok(())
}

fn demo_host() -> MockHost {
    MockHost::new()
        .with_granted(&["tabs"])
        .with_apps(vec![app("docs", "Docs"), app("sheets", "Sheets")])
        .with_top_sites(vec![
            site("https://news.example.com", "News"),
            site("https://mail.example.com", "Mail"),
        ])
        .with_bookmarks(vec![
            folder("1", "Bookmarks Bar", None),
            link("2", "Rust", "https://www.rust-lang.org", "1"),
            folder("3", "Work", Some("1")),
            link("4", "Docs.rs", "https://docs.rs", "1"),
            link("5", "Crates", "https://crates.io", "1"),
            link("6", "Blog", "https://blog.rust-lang.org", "1"),
        ])
}
