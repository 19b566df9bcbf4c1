//! "Last selected template" pointer per module, surviving across sessions.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::template::{Module, TemplateId};

/// Persisted client state consulted by the designer's selection chain.
pub trait SelectionMemory: Send + Sync {
    fn get(&self, module: Module) -> Option<TemplateId>;
    fn set(&self, module: Module, id: TemplateId);
    fn clear(&self, module: Module);
}

fn storage_key(module: Module) -> String {
    format!("last_template_{module}")
}

#[derive(Debug, Default)]
pub struct MemorySelection {
    inner: RwLock<BTreeMap<Module, TemplateId>>,
}

impl MemorySelection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionMemory for MemorySelection {
    fn get(&self, module: Module) -> Option<TemplateId> {
        self.inner.read().ok()?.get(&module).copied()
    }

    fn set(&self, module: Module, id: TemplateId) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(module, id);
        }
    }

    fn clear(&self, module: Module) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(&module);
        }
    }
}

/// JSON object on disk, keyed `last_template_<Module>`.
///
/// The file is read once on open and rewritten on every change. Read and
/// write failures are logged and the in-memory state stays authoritative.
#[derive(Debug)]
pub struct JsonFileSelection {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, TemplateId>>,
}

impl JsonFileSelection {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable selection file {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("failed to read selection file {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, TemplateId>) {
        let result = serde_json::to_string_pretty(entries)
            .map_err(crate::Error::from)
            .and_then(|json| std::fs::write(&self.path, json).map_err(crate::Error::from));
        if let Err(e) = result {
            log::warn!("failed to persist selection to {}: {e}", self.path.display());
        }
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, TemplateId>)) {
        let Ok(mut entries) = self.entries.write() else {
            log::warn!("selection state lock poisoned");
            return;
        };
        f(&mut *entries);
        self.persist(&*entries);
    }
}

impl SelectionMemory for JsonFileSelection {
    fn get(&self, module: Module) -> Option<TemplateId> {
        self.entries.read().ok()?.get(&storage_key(module)).copied()
    }

    fn set(&self, module: Module, id: TemplateId) {
        self.update(|e| {
            e.insert(storage_key(module), id);
        });
    }

    fn clear(&self, module: Module) {
        self.update(|e| {
            e.remove(&storage_key(module));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_selection_is_per_module() {
        let sel = MemorySelection::new();
        sel.set(Module::Sale, 4);
        assert_eq!(sel.get(Module::Sale), Some(4));
        assert_eq!(sel.get(Module::Purchase), None);
        sel.clear(Module::Sale);
        assert_eq!(sel.get(Module::Sale), None);
    }

    #[test]
    fn file_selection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        {
            let sel = JsonFileSelection::open(&path);
            sel.set(Module::Report, 12);
            sel.set(Module::Sale, 3);
            sel.clear(Module::Sale);
        }
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("last_template_Report"));

        let reopened = JsonFileSelection::open(&path);
        assert_eq!(reopened.get(Module::Report), Some(12));
        assert_eq!(reopened.get(Module::Sale), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        std::fs::write(&path, "not json").unwrap();
        let sel = JsonFileSelection::open(&path);
        assert_eq!(sel.get(Module::Sale), None);
    }
}
