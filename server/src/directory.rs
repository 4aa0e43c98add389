use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::{Context, Result};
use platform_authz::{Principal, PrincipalId, RawPrincipal};
use tracing::{info, warn};

/// Principals the host can open sessions for, keyed by their id.
/// Ids keep their JSON type, so `7` and `"7"` are different entries.
#[derive(Debug, Default)]
pub struct PrincipalDirectory {
    by_id: HashMap<PrincipalId, Arc<Principal>>,
}

impl PrincipalDirectory {
    pub fn load(path: &Path) -> Result<Self> {
        let payload = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read principals from {}", path.display()))?;
        let directory = Self::from_json(&payload)
            .with_context(|| format!("invalid principals file {}", path.display()))?;
        info!(count = directory.len(), path = %path.display(), "principal directory loaded");
        Ok(directory)
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        let raw: Vec<RawPrincipal> = serde_json::from_str(payload)?;
        let mut by_id = HashMap::with_capacity(raw.len());
        for entry in raw {
            let principal = Principal::from(entry);
            let Some(id) = principal.id.clone() else {
                warn!("skipping principal without id");
                continue;
            };
            if by_id.insert(id.clone(), Arc::new(principal)).is_some() {
                warn!(%id, "duplicate principal id; keeping the last entry");
            }
        }
        Ok(Self { by_id })
    }

    pub fn get(&self, id: &PrincipalId) -> Option<Arc<Principal>> {
        self.by_id.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
