//! # print-forge – configurable print templates for invoices, vouchers and reports
//!
//! Templates are named, per-module configurations stored behind an async
//! backend. Rendering turns a transaction document plus a template's
//! settings into a platform-neutral render tree. The stages are:
//!
//! 1. **Store** – load templates and resolve their stored configuration over
//!    the documented defaults ([`template`], [`settings`])
//! 2. **Resolve** – page geometry ([`geometry`]), style modes ([`style`]) and
//!    the column plan ([`columns`])
//! 3. **Aggregate** – totals, secondary-unit subtotals and balance
//!    ([`aggregate`])
//! 4. **Compose** – build the render tree ([`render`], [`render_tree`])
//! 5. **Measure** – lay the tree out with Taffy to estimate thermal roll
//!    length ([`layout`], [`fonts`])
//!
//! [`pipeline::render_document`] runs stages 2–5. The [`designer`] drives
//! template selection, live editing and persistence on top of all of it.

pub mod aggregate;
pub mod assets;
pub mod columns;
pub mod designer;
pub mod document;
pub mod error;
pub mod fonts;
pub mod format;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod render_tree;
pub mod samples;
pub mod selection;
pub mod settings;
pub mod style;
pub mod template;

// Re-exports for convenience
pub use designer::TemplateDesigner;
pub use document::{DocumentType, LineItem, Partner, TransactionDocument};
pub use error::{Error, Result};
pub use pipeline::render_document;
pub use render_tree::{RenderMode, RenderTree};
pub use settings::{ConfigMap, ConfigWarning, PrintSettings};
pub use template::{ConfigStore, Module, Template, TemplateDraft};
