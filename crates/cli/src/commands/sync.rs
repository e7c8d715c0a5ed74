//! Sync a single exported record to Mailchimp.
//!
//! Without `--force` the record goes through the same enabled switch and
//! gate as a post-commit sync, with every synced attribute treated as
//! changed. With `--force` both checks are skipped.

use std::path::Path;

use mailchimp_sync::{
    MailchimpClient, MailchimpConfig, OrderSynchronizer, ProductSynchronizer, SyncContext,
    SyncOutcome, SyncPolicies, Synchronizer, UserSynchronizer, VariantSynchronizer,
};
use mailchimp_sync_core::{ChangeSet, Order, Product, User, VariantId};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Errors specific to the sync command.
#[derive(Debug, Error)]
pub enum SyncCommandError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Variant {variant} not found on product {product}")]
    VariantNotFound { product: i64, variant: i64 },
}

/// Sync an order from a JSON file.
///
/// # Errors
///
/// Returns an error if configuration is missing, the file cannot be read,
/// or Mailchimp rejects the sync.
pub async fn order(file: &Path, force: bool) -> CommandResult {
    let order: Order = read_record(file).await?;
    let (client, policies) = connect()?;
    let ctx = SyncContext::new(&client, &policies);

    let outcome = run(&OrderSynchronizer::new(ctx, &order), force).await?;
    info!(number = %order.number, ?outcome, "Order sync finished");
    Ok(())
}

/// Sync a product, or all of its variants, from a JSON file.
///
/// # Errors
///
/// Returns an error if configuration is missing, the file cannot be read,
/// or Mailchimp rejects the sync.
pub async fn product(file: &Path, all_variants: bool, force: bool) -> CommandResult {
    let product: Product = read_record(file).await?;
    let (client, policies) = connect()?;
    let ctx = SyncContext::new(&client, &policies);
    let synchronizer = ProductSynchronizer::new(ctx, &product);

    if all_variants {
        let outcomes = synchronizer.sync_all_variants().await?;
        info!(product_id = %product.id, variants = outcomes.len(), "Variant sync finished");
    } else {
        let outcome = run(&synchronizer, force).await?;
        info!(product_id = %product.id, ?outcome, "Product sync finished");
    }
    Ok(())
}

/// Sync one variant of the product in a JSON file.
///
/// # Errors
///
/// Returns an error if the variant is not on the product, configuration is
/// missing, the file cannot be read, or Mailchimp rejects the sync.
pub async fn variant(file: &Path, variant_id: i64, force: bool) -> CommandResult {
    let product: Product = read_record(file).await?;
    let variant = product
        .variant(VariantId::new(variant_id))
        .ok_or(SyncCommandError::VariantNotFound {
            product: product.id.as_i64(),
            variant: variant_id,
        })?;
    let (client, policies) = connect()?;
    let ctx = SyncContext::new(&client, &policies);

    let outcome = run(&VariantSynchronizer::new(ctx, &product, variant), force).await?;
    info!(variant_id, ?outcome, "Variant sync finished");
    Ok(())
}

/// Sync a user from a JSON file.
///
/// # Errors
///
/// Returns an error if configuration is missing, the file cannot be read,
/// or Mailchimp rejects the sync.
pub async fn user(file: &Path, force: bool) -> CommandResult {
    let user: User = read_record(file).await?;
    let (client, policies) = connect()?;
    let ctx = SyncContext::new(&client, &policies);

    let outcome = run(&UserSynchronizer::new(ctx, &user), force).await?;
    info!(user_id = %user.id, ?outcome, "User sync finished");
    Ok(())
}

fn connect() -> Result<(MailchimpClient, SyncPolicies), Box<dyn std::error::Error>> {
    let config = MailchimpConfig::from_env()?;
    info!(store_url = %config.store_url(), "Connecting to Mailchimp");
    let client = MailchimpClient::new(&config)?;
    Ok((client, SyncPolicies::from_config(&config)))
}

async fn run<S: Synchronizer>(
    synchronizer: &S,
    force: bool,
) -> Result<SyncOutcome, mailchimp_sync::SyncError> {
    if force {
        synchronizer.sync().await
    } else {
        synchronizer.auto_sync(&ChangeSet::new(), true).await
    }
}

async fn read_record<T: DeserializeOwned>(file: &Path) -> Result<T, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(SyncCommandError::FileNotFound(file.display().to_string()).into());
    }
    let content = tokio::fs::read_to_string(file).await?;
    Ok(serde_json::from_str(&content)?)
}
