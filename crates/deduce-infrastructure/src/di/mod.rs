//! Dependency Resolution Engine
//!
//! ## Architecture Overview
//!
//! ```text
//! resolve::<dyn S>(modules)
//!   └─ Container ── registered? ──> Producer ──> instance
//!        │ no
//!        └─ TypeCatalog::assignable_types ──> ConstructorSelector
//!                                              └─ construction fn ──> Producer
//!
//! bind::<dyn C, dyn R>(modules)
//!   └─ TypeCatalog (both families) ──> KeyExtractor ──> DeductionIndex
//!
//! induce / suggest ──> DeductionIndex ──> Deduction ──> Container
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`container`] | The registry and its public operations |
//! | [`producer`] | Singleton and factory producers |
//! | [`selector`] | Constructor selection for auto-wiring |
//! | [`catalog`] | Memoized module scans |
//! | [`deduction`] | Cause/result pairings and their index |
//! | [`dependency`] | Consumer/supplier pairs |
//! | [`keys`] | Pairing key extraction |
//! | [`resolution`] | Per-thread cycle detection |

pub mod catalog;
pub mod container;
pub mod deduction;
pub mod dependency;
pub mod keys;
pub mod producer;
pub mod resolution;
pub mod selector;

pub use catalog::TypeCatalog;
pub use container::Container;
pub use deduction::{Deduction, DeductionIndex, DeductionKey};
pub use dependency::Dependency;
pub use keys::{leading_word, KeyExtractor, LeadingWord};
pub use producer::{ConstructionFn, Producer, ReusePredicate};
pub use resolution::resolution_chain;
pub use selector::ConstructorSelector;
