use dashgrid_layout::{Layout, StashStore};
use serde::{Deserialize, Serialize};

/// Layout and stash store, always read and replaced together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub layout: Layout,

    #[serde(default)]
    pub stash: StashStore,
}

impl Snapshot {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            stash: StashStore::new(),
        }
    }
}
