//! Resolution chain tracking
//!
//! Each thread keeps the stack of types it is currently resolving, tagged with
//! the container resolving them. Entering a type the same container is
//! already resolving is a cycle and fails with [`Error::CircularDependency`]
//! instead of recursing until the stack overflows. One container delegating
//! to another for the same type is not a cycle.

use std::cell::RefCell;

use deduce_domain::error::{Error, Result};
use deduce_domain::ports::TypeKey;

thread_local! {
    static RESOLUTION_CHAIN: RefCell<Vec<(u64, TypeKey)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a type as being resolved on the current thread until dropped
#[must_use = "the type leaves the resolution chain when the guard is dropped"]
pub(crate) struct ResolutionGuard {
    owner: u64,
    key: TypeKey,
}

impl ResolutionGuard {
    /// Push `key` resolved by container `owner`, failing if that container
    /// is already resolving it
    pub(crate) fn enter(owner: u64, key: TypeKey) -> Result<Self> {
        RESOLUTION_CHAIN.with(|chain| {
            let mut chain = chain.borrow_mut();
            if let Some(start) = chain.iter().position(|entry| *entry == (owner, key)) {
                let cycle = chain[start..]
                    .iter()
                    .filter(|(o, _)| *o == owner)
                    .map(|(_, k)| k.short_name())
                    .chain(std::iter::once(key.short_name()));
                return Err(Error::circular(cycle));
            }
            chain.push((owner, key));
            Ok(Self { owner, key })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_CHAIN.with(|chain| {
            let mut chain = chain.borrow_mut();
            if let Some(position) = chain
                .iter()
                .rposition(|entry| *entry == (self.owner, self.key))
            {
                chain.truncate(position);
            }
        });
    }
}

/// Types currently being resolved on this thread, outermost first
///
/// Spans every container resolving on this thread.
pub fn resolution_chain() -> Vec<TypeKey> {
    RESOLUTION_CHAIN.with(|chain| chain.borrow().iter().map(|(_, key)| *key).collect())
}
