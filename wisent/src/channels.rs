//! Named buffer channels
//!
//! A channel is a buffer file mapped under a name, so producers and readers
//! can agree on the name alone. Loading maps the file; releasing unmaps it.

use hashbrown::{hash_map::Entry, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};
use wisent_core::Buffer;

use crate::{config::LoadConfig, mmap_backend::BufferFile, Error, Result};

/// Registry of loaded channels
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    config: LoadConfig,
    channels: HashMap<String, BufferFile>,
}

impl ChannelRegistry {
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            channels: HashMap::new(),
        }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Map `path` under `channel`
    ///
    /// An already loaded channel is returned as is unless the registry was
    /// configured with `force_reload`, in which case it is remapped from
    /// `path`.
    pub fn load<P: AsRef<Path>>(&mut self, channel: &str, path: P) -> Result<&BufferFile> {
        let path = path.as_ref();
        match self.channels.entry(channel.to_owned()) {
            Entry::Occupied(entry) if !self.config.force_reload => {
                debug!(channel, "channel already loaded");
                Ok(entry.into_mut())
            }
            Entry::Occupied(mut entry) => {
                warn!(channel, path = %path.display(), "reloading channel");
                let file = BufferFile::open(path, &self.config)?;
                entry.insert(file).release();
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let file = BufferFile::open(path, &self.config)?;
                info!(
                    channel,
                    path = %path.display(),
                    arguments = file.header().argument_count,
                    expressions = file.header().expression_count,
                    "loaded channel"
                );
                Ok(entry.insert(file))
            }
        }
    }

    /// The mapping behind `channel`, if loaded
    pub fn get(&self, channel: &str) -> Option<&BufferFile> {
        self.channels.get(channel)
    }

    /// Borrow a view over a loaded channel
    pub fn buffer(&self, channel: &str) -> Result<Buffer<'_>> {
        self.get(channel)
            .ok_or_else(|| Error::ChannelNotLoaded(channel.to_owned()))?
            .buffer()
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    /// Unmap `channel`
    ///
    /// Fails with [`Error::ChannelNotLoaded`] if it is not loaded, including
    /// when it was already released.
    pub fn release(&mut self, channel: &str) -> Result<()> {
        let file = self
            .channels
            .remove(channel)
            .ok_or_else(|| Error::ChannelNotLoaded(channel.to_owned()))?;
        file.release();
        info!(channel, "released channel");
        Ok(())
    }

    /// Names of all loaded channels, in no particular order
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmap_backend::tests::write_buffer;
    use wisent_core::{sum_element, Node};

    fn longs(head: &str, values: &[i64]) -> Node {
        Node::expression(head, values.iter().copied().map(Node::Long).collect())
    }

    #[test]
    fn test_load_get_release() {
        let path = write_buffer("channel.wisent", &longs("root", &[10, 20, 30]));
        let mut registry = ChannelRegistry::default();

        registry.load("datapackage", &path).unwrap();
        assert!(registry.contains("datapackage"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.channels().collect::<Vec<_>>(), vec!["datapackage"]);

        let buffer = registry.buffer("datapackage").unwrap();
        assert_eq!(sum_element(&buffer.root().unwrap()), Ok(60));

        registry.release("datapackage").unwrap();
        assert!(registry.is_empty());
        assert!(registry.get("datapackage").is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_double_release() {
        let path = write_buffer("double.wisent", &longs("root", &[1]));
        let mut registry = ChannelRegistry::default();
        registry.load("a", &path).unwrap();

        registry.release("a").unwrap();
        assert!(matches!(
            registry.release("a"),
            Err(Error::ChannelNotLoaded(name)) if name == "a"
        ));
        assert!(matches!(
            registry.buffer("a"),
            Err(Error::ChannelNotLoaded(_))
        ));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_reload_policy() {
        let first = write_buffer("first.wisent", &longs("root", &[1, 2]));
        let second = write_buffer("second.wisent", &longs("root", &[5, 5, 5]));

        // Existing channels are kept by default
        let mut registry = ChannelRegistry::default();
        registry.load("data", &first).unwrap();
        let file = registry.load("data", &second).unwrap();
        assert_eq!(file.path(), first.as_path());

        // Forced reload remaps from the new path
        let mut registry = ChannelRegistry::new(LoadConfig::default().with_force_reload(true));
        registry.load("data", &first).unwrap();
        let file = registry.load("data", &second).unwrap();
        assert_eq!(file.path(), second.as_path());
        let buffer = registry.buffer("data").unwrap();
        assert_eq!(sum_element(&buffer.root().unwrap()), Ok(15));

        // A failed reload leaves the previous mapping in place
        let missing = first.with_extension("missing");
        assert!(registry.load("data", &missing).is_err());
        assert_eq!(registry.get("data").unwrap().path(), second.as_path());

        std::fs::remove_file(&first).unwrap();
        std::fs::remove_file(&second).unwrap();
    }
}
