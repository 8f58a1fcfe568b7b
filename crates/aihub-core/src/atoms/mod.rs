// ── Hub Atoms Layer ────────────────────────────────────────────────────────
// Pure constants, records and error types — zero side effects, no I/O.
// Dependency rule: atoms may only depend on std and external pure crates.
// Nothing here may import from store/, access or catalog.

pub mod constants;
pub mod error;
pub mod types;
