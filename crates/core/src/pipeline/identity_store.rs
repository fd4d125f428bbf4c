use std::sync::{Arc, PoisonError, RwLock};

use crate::recognition::domain::identity_label::IdentityLabel;

/// Creates the identity cell, returning its read side and its only writer.
///
/// The cell starts at Unknown. Reads always observe a whole label, either
/// the one before or the one after a concurrent publish.
pub fn identity_store() -> (IdentityStore, IdentityPublisher) {
    let cell = Arc::new(RwLock::new(IdentityLabel::unknown()));
    (
        IdentityStore { cell: cell.clone() },
        IdentityPublisher { cell },
    )
}

/// Read handle on the current identity label. Cheap to clone.
#[derive(Clone)]
pub struct IdentityStore {
    cell: Arc<RwLock<IdentityLabel>>,
}

impl IdentityStore {
    pub fn current(&self) -> IdentityLabel {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Sole writer of the identity cell. Deliberately not `Clone`.
pub struct IdentityPublisher {
    cell: Arc<RwLock<IdentityLabel>>,
}

impl IdentityPublisher {
    pub fn publish(&self, label: IdentityLabel) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = label;
    }
}
