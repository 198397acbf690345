//! Loading configuration

/// Options applied when a buffer file is mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadConfig {
    /// Validate every section against the file length at open time
    pub verify_layout: bool,
    /// Pre-fault the mapping (MAP_POPULATE where supported)
    pub populate: bool,
    /// Replace an already loaded channel instead of reusing it
    pub force_reload: bool,
}

impl LoadConfig {
    /// Validate the section layout when opening
    pub fn with_verify_layout(mut self, verify_layout: bool) -> Self {
        self.verify_layout = verify_layout;
        self
    }

    /// Pre-fault pages when mapping
    pub fn with_populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    /// Reload channels that are already present
    pub fn with_force_reload(mut self, force_reload: bool) -> Self {
        self.force_reload = force_reload;
        self
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            verify_layout: true,
            populate: false,
            force_reload: false,
        }
    }
}
