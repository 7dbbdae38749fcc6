//! Editor session: plays commands against a document and collects exports.

use std::collections::HashMap;
use std::path::PathBuf;

use canvas_core::{Document, ElementId, Interaction, ManipulationController, PointerEvent};
use canvas_renderer::{
    ExportArtifact, ExportConfig, ExportFormat, PageExporter, RenderResult, RenderSurface,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::script::Command;
use crate::EditorConfig;

type PendingExport = JoinHandle<RenderResult<Option<ExportArtifact>>>;

/// Outcome of a finished session.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files written, in the order the exports were requested.
    pub written: Vec<PathBuf>,
    /// Exports skipped because no surface was mounted.
    pub skipped: usize,
    /// User-facing messages for failures.
    pub notifications: Vec<String>,
}

/// A live editor: one document, its manipulation controller, an optional
/// mounted surface, and exports still being captured.
pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    controller: ManipulationController,
    surface: Option<RenderSurface>,
    exporter: PageExporter,
    names: HashMap<String, ElementId>,
    runtime: Handle,
    pending: Vec<PendingExport>,
    notifications: Vec<String>,
}

impl EditorSession {
    /// Create a session with a fresh one-page document and a mounted surface.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a Tokio runtime.
    pub fn new(config: EditorConfig) -> anyhow::Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| anyhow::anyhow!("Editor session needs a Tokio runtime: {e}"))?;
        let surface = RenderSurface::new(config.surface_width, config.surface_height);
        let exporter = PageExporter::new(ExportConfig {
            scale: config.scale,
            ..ExportConfig::default()
        });
        Ok(Self {
            config,
            document: Document::new(),
            controller: ManipulationController::new(),
            surface: Some(surface),
            exporter,
            names: HashMap::new(),
            runtime,
            pending: Vec::new(),
            notifications: Vec::new(),
        })
    }

    /// Replace the exporter, e.g. to change fonts or background.
    #[must_use]
    pub fn with_exporter(mut self, exporter: PageExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// The document being edited.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The manipulation controller.
    #[must_use]
    pub fn controller(&self) -> &ManipulationController {
        &self.controller
    }

    /// The mounted surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&RenderSurface> {
        self.surface.as_ref()
    }

    /// The element added under `name`, if it is still known.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).copied()
    }

    /// Messages raised so far.
    #[must_use]
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Apply a sequence of commands in order.
    pub fn run(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Apply one command. Failures become notifications, never panics.
    pub fn apply(&mut self, command: Command) {
        tracing::trace!("Applying {:?}", command);
        match command {
            Command::AddPage => {
                self.document.add_page();
            }
            Command::RemovePage { index } => {
                if !self.document.remove_page(index) {
                    tracing::debug!("RemovePage {} ignored", index);
                }
            }
            Command::SwitchPage { index } => {
                if let Err(e) = self.document.switch_page(index) {
                    self.notify(e.to_string());
                }
            }
            Command::AddElement {
                name,
                kind,
                width,
                height,
            } => {
                let id = self.document.add_element(kind, width, height);
                if let Some(name) = name {
                    self.names.insert(name, id);
                }
            }
            Command::UpdateElement { element, patch } => {
                if let Some(id) = self.resolve(&element) {
                    let page = self.document.active_index();
                    self.document.update_element(page, id, &patch);
                }
            }
            Command::DeleteElement { element } => {
                if let Some(id) = self.resolve(&element) {
                    let page = self.document.active_index();
                    if self.document.delete_element(page, id) {
                        self.forget(id);
                    }
                }
            }
            Command::Pointer(event) => self.pointer(&event),
            Command::Frame => {
                self.controller.flush_frame(&mut self.document);
            }
            Command::ToggleFlip { element } => {
                if let Some(id) = self.resolve(&element) {
                    let page = self.document.active_index();
                    ManipulationController::toggle_flip(&mut self.document, page, id);
                }
            }
            Command::Recolor { element, color } => {
                if let Some(id) = self.resolve(&element) {
                    let page = self.document.active_index();
                    ManipulationController::recolor(&mut self.document, page, id, &color);
                }
            }
            Command::Mount { width, height } => {
                self.surface = Some(RenderSurface::new(width, height));
            }
            Command::Unmount => {
                self.surface = None;
            }
            Command::Export { format } => self.export(format.into()),
        }
    }

    /// Start capturing the active page in the background.
    ///
    /// The page is snapshotted now; later edits do not affect this export.
    pub fn export(&mut self, format: ExportFormat) {
        let doc = self.document.clone();
        let surface = self.surface;
        let exporter = self.exporter.clone();
        tracing::debug!(
            "Queued {:?} export of page {}",
            format,
            doc.active_index() + 1
        );
        let handle = self
            .runtime
            .spawn_blocking(move || exporter.export(&doc, surface.as_ref(), format));
        self.pending.push(handle);
    }

    /// Wait for all queued exports and write them to the output directory.
    pub async fn finish(mut self) -> RunReport {
        let mut report = RunReport {
            notifications: std::mem::take(&mut self.notifications),
            ..RunReport::default()
        };

        let out_dir = self.config.out_dir.clone();
        if !self.pending.is_empty() {
            if let Err(e) = tokio::fs::create_dir_all(&out_dir).await {
                tracing::error!("Cannot create {}: {}", out_dir.display(), e);
            }
        }

        for handle in self.pending.drain(..) {
            let artifact = match handle.await {
                Ok(Ok(Some(artifact))) => artifact,
                Ok(Ok(None)) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(Err(e)) => {
                    notify_into(&mut report.notifications, format!("Export failed: {e}"));
                    continue;
                }
                Err(e) => {
                    notify_into(&mut report.notifications, format!("Export task failed: {e}"));
                    continue;
                }
            };

            let path = out_dir.join(&artifact.file_name);
            match tokio::fs::write(&path, &artifact.bytes).await {
                Ok(()) => {
                    tracing::info!("Wrote {}", path.display());
                    report.written.push(path);
                }
                Err(e) => notify_into(
                    &mut report.notifications,
                    format!("Cannot write {}: {e}", path.display()),
                ),
            }
        }

        report
    }

    fn pointer(&mut self, event: &PointerEvent) {
        match self.controller.handle(&mut self.document, event) {
            Interaction::Deleted(id) => self.forget(id),
            Interaction::PickColor(id) => {
                tracing::info!("Color picker requested for {}", id);
            }
            Interaction::Rejected => {
                tracing::debug!("Pointer down at ({}, {}) rejected", event.x, event.y);
            }
            other => tracing::trace!("Pointer {:?}: {:?}", event.phase, other),
        }
    }

    fn resolve(&self, name: &str) -> Option<ElementId> {
        let id = self.element(name);
        if id.is_none() {
            tracing::warn!("Unknown element name {:?}", name);
        }
        id
    }

    fn forget(&mut self, id: ElementId) {
        self.names.retain(|_, known| *known != id);
    }

    fn notify(&mut self, message: String) {
        notify_into(&mut self.notifications, message);
    }
}

fn notify_into(notifications: &mut Vec<String>, message: String) {
    tracing::error!("{}", message);
    notifications.push(message);
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("config", &self.config)
            .field("document", &self.document)
            .field("controller", &self.controller)
            .field("surface", &self.surface)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
