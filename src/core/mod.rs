//! Core business logic - framework-agnostic catalog operations.

/// Product aggregate loading and transactional writes
pub mod product;
/// Pure payload-to-graph transformations used by the product update
pub mod reconcile;
/// Reference queries and link removal
pub mod reference;
