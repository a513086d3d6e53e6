//! Module authorization table
//!
//! A single boolean table `ModuleId -> bool`, settable only by the
//! configuration authority fixed at construction. There is no implicit
//! default-allow: an address absent from the table is unauthorized.

use auric_core::ModuleId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Trust table gating every cross-module notification
pub struct AuthorizationTable {
    /// Authorized module addresses
    entries: RwLock<HashMap<ModuleId, bool>>,

    /// The configuration authority; the only address allowed to mutate the
    /// table, always implicitly authorized
    authority: ModuleId,
}

impl AuthorizationTable {
    /// Create a table owned by a configuration authority
    pub fn new(authority: ModuleId) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            authority,
        }
    }

    /// The configuration authority address
    pub fn authority(&self) -> ModuleId {
        self.authority
    }

    /// Check whether a caller may invoke notification entry points
    pub fn is_authorized(&self, caller: &ModuleId) -> bool {
        if *caller == self.authority {
            return true;
        }
        self.entries.read().get(caller).copied().unwrap_or(false)
    }

    /// Add or remove a module, authority only. Returns false (and changes
    /// nothing) when the caller is not the authority.
    pub fn set_authorized(&self, caller: &ModuleId, module: ModuleId, allowed: bool) -> bool {
        if *caller != self.authority {
            return false;
        }
        self.entries.write().insert(module, allowed);
        tracing::info!("Authorization updated: module={} allowed={}", module, allowed);
        true
    }
}
