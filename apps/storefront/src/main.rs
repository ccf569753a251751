//! # Storefront Entry Point
//!
//! Loads the store snapshot, keeps the open/closed status current and
//! waits for Ctrl-C. The setup lives in `lib.rs` so it can be tested.
//!
//! ## Running
//! ```text
//! STOREFRONT_SNAPSHOT=./snapshot.json RUST_LOG=debug storefront
//! ```

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    storefront_lib::run().await?;
    Ok(())
}
