//! Configuration store – named print templates per document module.
//!
//! Persistence goes through the async [`TemplateBackend`] seam. The
//! [`ConfigStore`] adds the store semantics on top: default lookup,
//! create-or-update saves, and resolution of a stored payload into typed
//! settings layered over the documented defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::DocumentType;
use crate::error::{Error, Result};
use crate::settings::{ConfigMap, ConfigWarning, PrintSettings};

pub type TemplateId = i64;

/// Document category a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Module {
    Sale,
    Purchase,
    Report,
    Receipt,
    Payment,
}

impl Module {
    pub const ALL: [Module; 5] = [
        Module::Sale,
        Module::Purchase,
        Module::Report,
        Module::Receipt,
        Module::Payment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Module::Sale => "Sale",
            Module::Purchase => "Purchase",
            Module::Report => "Report",
            Module::Receipt => "Receipt",
            Module::Payment => "Payment",
        }
    }

    /// Templates used for `doc_type`. Order history prints with sale templates.
    pub fn for_document(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Sale | DocumentType::History => Module::Sale,
            DocumentType::Purchase => Module::Purchase,
            DocumentType::Report => Module::Report,
            DocumentType::Receipt => Module::Receipt,
            DocumentType::Payment => Module::Payment,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stored payload
// ---------------------------------------------------------------------------

/// Template configuration as the backend returns it: a JSON-encoded
/// string or a native object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigPayload {
    Encoded(String),
    Object(serde_json::Map<String, Value>),
    #[default]
    Empty,
}

impl ConfigPayload {
    pub fn from_map(map: &ConfigMap) -> Self {
        ConfigPayload::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    /// Decode into the wire map. Undecodable payloads give an empty map and
    /// a warning.
    pub fn decode(&self) -> (ConfigMap, Option<ConfigWarning>) {
        match self {
            ConfigPayload::Empty => (ConfigMap::new(), None),
            ConfigPayload::Object(obj) => (stringify(obj), None),
            ConfigPayload::Encoded(s) if s.trim().is_empty() => (ConfigMap::new(), None),
            ConfigPayload::Encoded(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(obj)) => (stringify(&obj), None),
                Ok(Value::Null) => (ConfigMap::new(), None),
                Ok(other) => (
                    ConfigMap::new(),
                    Some(ConfigWarning::MalformedPayload {
                        reason: format!("expected an object, found {other}"),
                    }),
                ),
                Err(e) => (
                    ConfigMap::new(),
                    Some(ConfigWarning::MalformedPayload {
                        reason: e.to_string(),
                    }),
                ),
            },
        }
    }
}

fn stringify(obj: &serde_json::Map<String, Value>) -> ConfigMap {
    obj.iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub module: Module,
    #[serde(default)]
    pub config: ConfigPayload,
    #[serde(default)]
    pub is_default: bool,
}

/// Create/update request body.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    /// `None` creates a new template.
    pub id: Option<TemplateId>,
    pub name: String,
    pub module: Module,
    pub config: ConfigMap,
    /// `None` leaves the stored flag untouched on update.
    pub is_default: Option<bool>,
}

/// Persistence seam for templates.
#[async_trait]
pub trait TemplateBackend: Send + Sync {
    async fn list(&self, module: Option<Module>) -> Result<Vec<Template>>;
    async fn create(&self, draft: TemplateDraft) -> Result<Template>;
    async fn update(&self, id: TemplateId, draft: TemplateDraft) -> Result<Template>;
    async fn delete(&self, id: TemplateId) -> Result<()>;
}

// ── MemoryTemplateBackend ──

/// In-memory backend for tests and embedded hosts.
///
/// Ids are sequential. At most one template per module carries
/// `is_default`; setting it clears the flag on the others.
pub struct MemoryTemplateBackend {
    inner: RwLock<BTreeMap<TemplateId, Template>>,
    next_id: AtomicI64,
    offline: AtomicBool,
}

impl MemoryTemplateBackend {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            offline: AtomicBool::new(false),
        }
    }

    /// Make every call fail with [`Error::Backend`], simulating an outage.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Backend("backend unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn clear_other_defaults(store: &mut BTreeMap<TemplateId, Template>, keep: TemplateId, module: Module) {
        for t in store.values_mut() {
            if t.module == module && t.id != keep {
                t.is_default = false;
            }
        }
    }
}

impl Default for MemoryTemplateBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> Error {
    Error::Backend(format!("Lock: {e}"))
}

#[async_trait]
impl TemplateBackend for MemoryTemplateBackend {
    async fn list(&self, module: Option<Module>) -> Result<Vec<Template>> {
        self.check_online()?;
        let store = self.inner.read().map_err(lock_err)?;
        Ok(store
            .values()
            .filter(|t| module.map_or(true, |m| t.module == m))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: TemplateDraft) -> Result<Template> {
        self.check_online()?;
        let mut store = self.inner.write().map_err(lock_err)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let template = Template {
            id,
            name: draft.name,
            module: draft.module,
            config: ConfigPayload::from_map(&draft.config),
            is_default: draft.is_default.unwrap_or(false),
        };
        if template.is_default {
            Self::clear_other_defaults(&mut store, id, template.module);
        }
        store.insert(id, template.clone());
        Ok(template)
    }

    async fn update(&self, id: TemplateId, draft: TemplateDraft) -> Result<Template> {
        self.check_online()?;
        let mut store = self.inner.write().map_err(lock_err)?;
        let existing = store.get_mut(&id).ok_or(Error::TemplateNotFound(id))?;
        existing.name = draft.name;
        existing.module = draft.module;
        existing.config = ConfigPayload::from_map(&draft.config);
        if let Some(flag) = draft.is_default {
            existing.is_default = flag;
        }
        let updated = existing.clone();
        if updated.is_default {
            Self::clear_other_defaults(&mut store, id, updated.module);
        }
        Ok(updated)
    }

    async fn delete(&self, id: TemplateId) -> Result<()> {
        self.check_online()?;
        let mut store = self.inner.write().map_err(lock_err)?;
        store.remove(&id).map(|_| ()).ok_or(Error::TemplateNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Template store semantics over a backend.
#[derive(Clone)]
pub struct ConfigStore {
    backend: Arc<dyn TemplateBackend>,
}

impl ConfigStore {
    pub fn new(backend: Arc<dyn TemplateBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self, module: Module) -> Result<Vec<Template>> {
        self.backend.list(Some(module)).await
    }

    /// The module's default template, else its first one.
    pub async fn get_default(&self, module: Module) -> Result<Option<Template>> {
        let templates = self.list(module).await?;
        Ok(templates
            .iter()
            .find(|t| t.is_default)
            .or_else(|| templates.first())
            .cloned())
    }

    /// Create when `draft.id` is `None`, otherwise update.
    pub async fn save(&self, draft: TemplateDraft) -> Result<Template> {
        match draft.id {
            None => self.backend.create(draft).await,
            Some(id) => self.backend.update(id, draft).await,
        }
    }

    pub async fn delete(&self, id: TemplateId) -> Result<()> {
        self.backend.delete(id).await
    }

    /// Typed settings for `template`: defaults with stored values on top.
    pub fn resolve(template: &Template) -> (PrintSettings, Vec<ConfigWarning>) {
        let (stored, payload_warning) = template.config.decode();
        if let Some(w) = &payload_warning {
            log::warn!("template {} ({}): {w}", template.id, template.name);
        }
        let (settings, warnings) = PrintSettings::from_map(&stored);
        (settings, payload_warning.into_iter().chain(warnings).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, module: Module, is_default: Option<bool>) -> TemplateDraft {
        TemplateDraft {
            id: None,
            name: name.to_string(),
            module,
            config: ConfigMap::new(),
            is_default,
        }
    }

    #[test]
    fn payload_accepts_string_or_object() {
        let encoded: Template = serde_json::from_str(
            r#"{"id": 1, "name": "A", "module": "Sale", "config": "{\"paper_size\": \"A5\", \"invoice_font_size\": 14}"}"#,
        )
        .unwrap();
        let (map, warning) = encoded.config.decode();
        assert!(warning.is_none());
        assert_eq!(map["paper_size"], "A5");
        assert_eq!(map["invoice_font_size"], "14");

        let object: Template = serde_json::from_str(
            r#"{"id": 2, "name": "B", "module": "Sale", "config": {"invoice_show_logo": false}}"#,
        )
        .unwrap();
        assert_eq!(object.config.decode().0["invoice_show_logo"], "false");

        let null: Template =
            serde_json::from_str(r#"{"id": 3, "name": "C", "module": "Sale", "config": null}"#).unwrap();
        assert_eq!(null.config, ConfigPayload::Empty);
    }

    #[test]
    fn malformed_payload_falls_back_with_warning() {
        let t = Template {
            id: 9,
            name: "Broken".into(),
            module: Module::Sale,
            config: ConfigPayload::Encoded("{not json".into()),
            is_default: false,
        };
        let (settings, warnings) = ConfigStore::resolve(&t);
        assert_eq!(settings, PrintSettings::default());
        assert!(matches!(warnings[0], ConfigWarning::MalformedPayload { .. }));
    }

    #[tokio::test]
    async fn update_preserves_default_flag_when_omitted() {
        let backend = MemoryTemplateBackend::new();
        let t = backend.create(draft("Main", Module::Sale, Some(true))).await.unwrap();
        let updated = backend
            .update(t.id, draft("Renamed", Module::Sale, None))
            .await
            .unwrap();
        assert!(updated.is_default);
        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    async fn default_is_unique_per_module() {
        let backend = MemoryTemplateBackend::new();
        let a = backend.create(draft("A", Module::Sale, Some(true))).await.unwrap();
        let other = backend.create(draft("P", Module::Purchase, Some(true))).await.unwrap();
        let b = backend.create(draft("B", Module::Sale, Some(true))).await.unwrap();
        let sale = backend.list(Some(Module::Sale)).await.unwrap();
        assert!(!sale.iter().find(|t| t.id == a.id).unwrap().is_default);
        assert!(sale.iter().find(|t| t.id == b.id).unwrap().is_default);
        let purchase = backend.list(Some(Module::Purchase)).await.unwrap();
        assert!(purchase.iter().find(|t| t.id == other.id).unwrap().is_default);
    }

    #[tokio::test]
    async fn store_default_falls_back_to_first() {
        let store = ConfigStore::new(Arc::new(MemoryTemplateBackend::new()));
        assert!(store.get_default(Module::Report).await.unwrap().is_none());
        let first = store.save(draft("R1", Module::Report, None)).await.unwrap();
        store.save(draft("R2", Module::Report, None)).await.unwrap();
        assert_eq!(store.get_default(Module::Report).await.unwrap().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn delete_missing_template_errors() {
        let backend = MemoryTemplateBackend::new();
        let err = backend.delete(42).await.unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(42)));
    }

    #[tokio::test]
    async fn offline_backend_fails() {
        let backend = MemoryTemplateBackend::new();
        backend.set_offline(true);
        assert!(matches!(backend.list(None).await, Err(Error::Backend(_))));
    }
}
