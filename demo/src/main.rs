use anyhow::Result;
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use welcomehub_core::{
    load_registry, Container, ContainerRecord, ContainerRegistry, InMemoryStore, RecordStore,
};
use welcomehub_trust::{evaluate, Certification, DocumentRef, ProfileInput};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .pretty()
        .init();

    info!("Starting WelcomeHub demo...");

    // 1. Score a submitted profile
    let profile = ProfileInput::new()
        .with_name("Ada Lovelace")
        .with_email("ada@example.com")
        .with_phone("5551234567")
        .with_certification(Certification::new("First Aid", "Red Cross", "2024-03-01"))
        .with_verification_document(DocumentRef::new("passport.pdf"));
    profile.validate_submission()?;

    let trust = evaluate(&profile);
    info!("Trust score: {}", trust);
    for badge in &trust.badges {
        info!("  Badge: {}", badge);
    }

    // 2. Build a small container tree
    let mut registry = ContainerRegistry::new();
    let hub = registry.insert(Container::new("Hub", "Everything for newcomers")?)?;
    let guides = registry.insert(Container::new("Guides", "Interactive guides")?.with_parent(hub))?;
    let first_week = registry.insert(
        Container::new("First week", "What to do on day one")?.with_parent(guides),
    )?;
    registry.add_dynamic_attribute(first_week, "duration", json!("5 days"))?;

    let breadcrumb: Vec<&str> = registry
        .hierarchy(first_week)?
        .into_iter()
        .map(|c| c.name())
        .collect();
    info!("Breadcrumb: {}", breadcrumb.join(" / "));

    // 3. Persist and reload through the record store
    let store: InMemoryStore<ContainerRecord> = InMemoryStore::new();
    for record in registry.records()? {
        store.insert(record).await?;
    }
    let reloaded = load_registry(&store).await?;
    info!("Reloaded {} containers", reloaded.len());

    info!("Demo completed successfully!");
    Ok(())
}
