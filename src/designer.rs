//! Template designer – selection, editing and persistence of templates for
//! one module at a time, with every edit immediately visible in renders.
//!
//! Edits are local until [`TemplateDesigner::save`]. Failed backend calls
//! leave the local state as it was (still dirty) and surface the error.

use std::sync::Arc;

use crate::assets::AssetStore;
use crate::document::TransactionDocument;
use crate::error::{Error, Result};
use crate::fonts::FontRegistry;
use crate::interaction::Region;
use crate::pipeline::render_document;
use crate::render_tree::{RenderMode, RenderTree};
use crate::samples;
use crate::selection::SelectionMemory;
use crate::settings::{Applied, ConfigWarning, PrintSettings, ShopInfo};
use crate::template::{ConfigStore, Module, Template, TemplateDraft, TemplateId};

/// Pick the template to bind: `target`, then the remembered `last`, then
/// the module default, then the first one. Ids not in `templates` are
/// skipped.
pub fn select_candidate(
    templates: &[Template],
    target: Option<TemplateId>,
    last: Option<TemplateId>,
) -> Option<&Template> {
    let by_id = move |id: Option<TemplateId>| id.and_then(|id| templates.iter().find(|t| t.id == id));
    by_id(target)
        .or_else(|| by_id(last))
        .or_else(|| templates.iter().find(|t| t.is_default))
        .or_else(|| templates.first())
}

fn shop_entries(info: &ShopInfo) -> [(&'static str, &str); 6] {
    [
        ("shop_name", info.name.as_str()),
        ("shop_address", info.address.as_str()),
        ("shop_phone", info.phone.as_str()),
        ("shop_bank", info.bank.as_str()),
        ("shop_bank_account", info.bank_account.as_str()),
        ("shop_bank_user", info.bank_user.as_str()),
    ]
}

pub struct TemplateDesigner {
    store: ConfigStore,
    selection: Arc<dyn SelectionMemory>,
    assets: Arc<dyn AssetStore>,
    fonts: FontRegistry,
    module: Module,
    templates: Vec<Template>,
    current: Option<TemplateId>,
    name: String,
    settings: PrintSettings,
    dirty: bool,
    warnings: Vec<ConfigWarning>,
}

impl TemplateDesigner {
    /// A designer for `Module::Sale` with nothing loaded yet; call
    /// [`switch_module`](Self::switch_module) to load templates.
    pub fn new(
        store: ConfigStore,
        selection: Arc<dyn SelectionMemory>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            store,
            selection,
            assets,
            fonts: FontRegistry::new(),
            module: Module::Sale,
            templates: Vec::new(),
            current: None,
            name: String::new(),
            settings: PrintSettings::default(),
            dirty: false,
            warnings: Vec::new(),
        }
    }

    // ── State ──

    pub fn module(&self) -> Module {
        self.module
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// The bound stored template; `None` for drafts and empty modules.
    pub fn selected(&self) -> Option<&Template> {
        let id = self.current?;
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &PrintSettings {
        &self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Warnings from resolving the bound template's stored configuration.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    // ── Selection ──

    pub async fn switch_module(&mut self, module: Module) -> Result<()> {
        self.module = module;
        self.templates.clear();
        let loaded = self.refresh().await;
        self.apply_selection(None);
        loaded
    }

    /// Reload the module's templates from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.store.list(self.module).await {
            Ok(templates) => {
                self.templates = templates;
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to load {} templates: {e}", self.module);
                Err(e)
            }
        }
    }

    fn apply_selection(&mut self, target: Option<TemplateId>) {
        let last = self.selection.get(self.module);
        match select_candidate(&self.templates, target, last).cloned() {
            Some(template) => self.bind(&template),
            None => {
                log::debug!("no {} template; using built-in defaults", self.module);
                self.current = None;
                self.name.clear();
                self.settings = PrintSettings::default();
                self.warnings.clear();
                self.dirty = false;
            }
        }
    }

    fn bind(&mut self, template: &Template) {
        let (settings, warnings) = ConfigStore::resolve(template);
        self.current = Some(template.id);
        self.name = template.name.clone();
        self.settings = settings;
        self.warnings = warnings;
        self.dirty = false;
        self.selection.set(self.module, template.id);
    }

    /// Bind the stored template `id`.
    pub fn select(&mut self, id: TemplateId) -> Result<()> {
        let template = self
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(Error::TemplateNotFound(id))?;
        self.bind(&template);
        Ok(())
    }

    // ── Editing ──

    /// Apply one wire-form edit to the live settings.
    pub fn update_field(&mut self, key: &str, value: &str) -> Result<Applied> {
        let applied = self.settings.set(key, value)?;
        self.dirty = true;
        Ok(applied)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    /// Start an unsaved template bound to the defaults.
    pub fn create_new(&mut self, name: impl Into<String>) {
        self.current = None;
        self.name = name.into();
        self.settings = PrintSettings::default();
        self.warnings.clear();
        self.dirty = true;
    }

    /// Toggle the setting behind a preview click target.
    pub fn activate(&mut self, region: Region) -> Result<()> {
        for edit in region.edits(&self.settings) {
            self.update_field(edit.key, &edit.value)?;
        }
        Ok(())
    }

    // ── Persistence ──

    /// Create or update the current template and re-select the result.
    pub async fn save(&mut self) -> Result<Template> {
        let name = match self.name.trim() {
            "" => format!("New {} template", self.module),
            n => n.to_string(),
        };
        let draft = TemplateDraft {
            id: self.current,
            name,
            module: self.module,
            config: self.settings.to_map(),
            is_default: None,
        };
        let saved = self.store.save(draft).await.map_err(|e| {
            log::warn!("failed to save template {:?}: {e}", self.current);
            e
        })?;

        if self.refresh().await.is_err() {
            self.templates.retain(|t| t.id != saved.id);
            self.templates.push(saved.clone());
        }
        self.apply_selection(Some(saved.id));
        log::info!("saved {} template {} ({})", self.module, saved.id, saved.name);
        Ok(saved)
    }

    /// Delete the current template, then re-run the selection chain.
    pub async fn delete(&mut self) -> Result<()> {
        let id = self.current.ok_or(Error::NothingSelected)?;
        self.store.delete(id).await.map_err(|e| {
            log::warn!("failed to delete template {id}: {e}");
            e
        })?;

        if self.selection.get(self.module) == Some(id) {
            self.selection.clear(self.module);
        }
        if self.refresh().await.is_err() {
            self.templates.retain(|t| t.id != id);
        }
        self.apply_selection(None);
        log::info!("deleted {} template {id}", self.module);
        Ok(())
    }

    /// Write the shop identity into every stored template of every module,
    /// then reload the current selection.
    pub async fn sync_shop_info(&mut self, info: &ShopInfo) -> Result<()> {
        for module in Module::ALL {
            for template in self.store.list(module).await? {
                let (mut config, _) = template.config.decode();
                for (key, value) in shop_entries(info) {
                    config.insert(key.to_string(), value.to_string());
                }
                self.store
                    .save(TemplateDraft {
                        id: Some(template.id),
                        name: template.name,
                        module,
                        config,
                        is_default: None,
                    })
                    .await
                    .map_err(|e| {
                        log::warn!("failed to sync shop info into template {}: {e}", template.id);
                        e
                    })?;
            }
        }

        self.refresh().await?;
        if self.dirty {
            self.settings.shop.info = info.clone();
        } else {
            self.apply_selection(self.current);
        }
        Ok(())
    }

    // ── Assets ──

    /// Upload and register a font, and make it the document font.
    pub async fn upload_font(&mut self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let upload = self
            .assets
            .upload_font(filename, bytes.clone())
            .await
            .map_err(|e| {
                log::warn!("font upload failed: {e}");
                e
            })?;
        self.fonts.register(&upload.filename, bytes)?;
        self.update_field("invoice_custom_font_name", &upload.filename)?;
        Ok(upload.filename)
    }

    pub async fn upload_logo(&mut self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let upload = self.assets.upload_logo(filename, bytes).await.map_err(|e| {
            log::warn!("logo upload failed: {e}");
            e
        })?;
        self.update_field("invoice_logo_url", &upload.url)?;
        Ok(upload.url)
    }

    /// Register every font already in the asset store. Fonts that fail to
    /// register are logged and skipped.
    pub async fn load_fonts(&mut self) -> Result<usize> {
        let mut loaded = 0;
        for filename in self.assets.list_fonts().await? {
            if self.fonts.contains(&filename) {
                continue;
            }
            let bytes = self.assets.font_bytes(&filename).await?;
            match self.fonts.register(&filename, bytes) {
                Ok(()) => loaded += 1,
                Err(e) => log::warn!("skipping font {filename}: {e}"),
            }
        }
        Ok(loaded)
    }

    // ── Rendering ──

    pub fn preview(&self, document: &TransactionDocument) -> Option<RenderTree> {
        render_document(Some(document), &self.settings, RenderMode::Preview, &self.fonts)
    }

    pub fn print(&self, document: &TransactionDocument) -> Option<RenderTree> {
        render_document(Some(document), &self.settings, RenderMode::Print, &self.fonts)
    }

    /// Preview data for the current module.
    pub fn sample_document(&self) -> TransactionDocument {
        samples::sample_document(self.module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetStore;
    use crate::selection::MemorySelection;
    use crate::template::{ConfigPayload, MemoryTemplateBackend, TemplateBackend};

    fn template(id: TemplateId, is_default: bool) -> Template {
        Template {
            id,
            name: format!("T{id}"),
            module: Module::Sale,
            config: ConfigPayload::Empty,
            is_default,
        }
    }

    fn designer() -> (TemplateDesigner, Arc<MemoryTemplateBackend>, Arc<MemorySelection>) {
        let backend = Arc::new(MemoryTemplateBackend::new());
        let selection = Arc::new(MemorySelection::new());
        let designer = TemplateDesigner::new(
            ConfigStore::new(backend.clone()),
            selection.clone(),
            Arc::new(MemoryAssetStore::new()),
        );
        (designer, backend, selection)
    }

    #[test]
    fn selection_chain_order() {
        let list = vec![template(1, false), template(2, true), template(3, false)];
        assert_eq!(select_candidate(&list, None, None).unwrap().id, 2);
        assert_eq!(select_candidate(&list, None, Some(3)).unwrap().id, 3);
        assert_eq!(select_candidate(&list, Some(1), Some(3)).unwrap().id, 1);
        assert_eq!(select_candidate(&list, Some(99), Some(98)).unwrap().id, 2);
        let plain = vec![template(5, false), template(6, false)];
        assert_eq!(select_candidate(&plain, None, None).unwrap().id, 5);
        assert!(select_candidate(&[], Some(1), Some(1)).is_none());
    }

    #[tokio::test]
    async fn edits_are_live_and_mark_dirty() {
        let (mut d, _, _) = designer();
        d.switch_module(Module::Sale).await.unwrap();
        assert!(!d.is_dirty());
        d.update_field("invoice_show_logo", "false").unwrap();
        assert!(d.is_dirty());
        assert!(!d.settings().shop.show_logo);
    }

    #[tokio::test]
    async fn save_creates_then_updates() {
        let (mut d, backend, selection) = designer();
        d.switch_module(Module::Purchase).await.unwrap();
        d.create_new("");
        d.update_field("paper_size", "A5").unwrap();
        let created = d.save().await.unwrap();
        assert_eq!(created.name, "New Purchase template");
        assert_eq!(d.selected().unwrap().id, created.id);
        assert_eq!(selection.get(Module::Purchase), Some(created.id));
        assert!(!d.is_dirty());

        d.update_field("paper_size", "K80").unwrap();
        let updated = d.save().await.unwrap();
        assert_eq!(updated.id, created.id);
        let stored = backend.list(Some(Module::Purchase)).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].config.decode().0["paper_size"], "K80");
    }

    #[tokio::test]
    async fn failed_save_keeps_edits() {
        let (mut d, backend, _) = designer();
        d.switch_module(Module::Sale).await.unwrap();
        d.create_new("Draft");
        d.update_field("invoice_title_size", "30").unwrap();
        backend.set_offline(true);
        assert!(matches!(d.save().await, Err(Error::Backend(_))));
        assert!(d.is_dirty());
        assert_eq!(d.settings().title.size, 30.0);
        assert_eq!(d.name(), "Draft");
    }

    #[tokio::test]
    async fn delete_without_selection_errors() {
        let (mut d, _, _) = designer();
        d.switch_module(Module::Report).await.unwrap();
        assert!(matches!(d.delete().await, Err(Error::NothingSelected)));
    }

    #[tokio::test]
    async fn activate_title_toggles_badge() {
        let (mut d, _, _) = designer();
        d.switch_module(Module::Sale).await.unwrap();
        let before = d.settings().title.badge;
        d.activate(Region::Title).unwrap();
        assert_eq!(d.settings().title.badge, !before);
        assert!(d.is_dirty());
    }

    #[tokio::test]
    async fn logo_upload_sets_url() {
        let (mut d, _, _) = designer();
        d.switch_module(Module::Sale).await.unwrap();
        let url = d.upload_logo("brand.png", vec![0x89, 0x50]).await.unwrap();
        assert_eq!(d.settings().shop.logo_url, url);
    }
}
