//! Viewer-based privacy filtering.
//!
//! Every record leaving the service layer passes through this seam, on both
//! the list path and the detail path. The present data model exposes no
//! confidential fields, so the pass is currently an identity transform --
//! but any future field that should be hidden from non-owners (an exact
//! street address, say) must be masked here, keyed off ownership.

use uuid::Uuid;

/// Whether `viewer` owns a record created by `owner`.
pub fn is_owner(owner: Uuid, viewer: Option<Uuid>) -> bool {
    viewer.is_some_and(|v| v == owner)
}

/// A record that can be redacted for a given viewer.
///
/// Implementations must be idempotent: filtering an already-filtered record
/// is a no-op.
pub trait PrivacyFiltered: Sized {
    /// The id of the customer who owns this record.
    fn owner_id(&self) -> Uuid;

    /// Remove or mask fields the viewer is not allowed to see.
    fn apply_privacy(self, viewer: Option<Uuid>) -> Self {
        // Current policy: all fields are public.
        let _ = viewer;
        self
    }
}
