//! Log output for the demo binary and anything else embedding the crate.
//!
//! Levels come from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run       # one line per completed request
//! RUST_LOG=debug cargo run      # request payloads and query sizes
//! RUST_LOG=doc_store=debug,recipe_core=info cargo run
//! ```
//!
//! Spans opened by `#[instrument]` on the store and session operations show up
//! inline, e.g. `INFO create: Recipe created recipe_id="recipe_1"`.

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
