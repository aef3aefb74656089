use monogram::application_impl::*;
use monogram::application_port::*;
use monogram::domain_model::*;
use std::sync::Arc;

// Exercises projection and batch resolution against the memory backend.
// $ cargo run --bin resolve_demo
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let store = Arc::new(MemIdentityStore::new());
    let ada = store.add_user("Ada");
    let grace = store.add_user("Grace");
    store.link_account(&grace, Provider::Discord, "acc42")?;

    let service = RealIdentityService::new(store.clone(), store.clone());

    println!("Ada   -> {:?}", service.canonical_identity(&ada).await?);
    println!("Grace -> {:?}", service.canonical_identity(&grace).await?);

    let batch = service
        .resolve_batch(vec![
            ResolveEntry::new(ada.as_str(), AuthMethod::Local),
            ResolveEntry::new("acc42", AuthMethod::Discord),
            ResolveEntry::new("ghost", AuthMethod::Google),
        ])
        .await?;

    for (index, resolution) in batch.results.iter().enumerate() {
        println!(
            "[{}] {} (resolved: {})",
            index,
            resolution.as_id(),
            resolution.is_resolved()
        );
    }
    for diagnostic in &batch.diagnostics {
        println!("diagnostic: {:?}", diagnostic);
    }

    Ok(())
}
