//! Registrar facade
//!
//! The [`Registrar`] owns the plugin layout, settings, backup store and
//! session lock, and coordinates the engines:
//!
//! - **reads**: `scan`, `reconcile`, `render_report`
//! - **mutations**: `add_missing`, `remove_orphaned`, `sync`,
//!   `rename_friendly_name`, `edit_button`, `restore_backup`, `import_resource`
//!
//! Every mutation runs under the session lock, rescans before planning,
//! snapshots the files it is about to change and rescans again afterwards.
//! A failed snapshot aborts the mutation before anything is written.

use crate::artifact::ArtifactKind;
use crate::backup::{BackupManager, BackupManifest, RestoreReport};
use crate::buttons::{ButtonEdit, ConfigModel, ConfigScope};
use crate::job::JobSlot;
use crate::monitor::WatchSet;
use crate::patch::{EntryReport, FileChange, PatchPlan, PatchPreview, TextPatchEngine};
use crate::reconcile::Reconciliation;
use crate::report::Report;
use crate::scanner::{Origin, ResourceEntity, validate_name};
use crate::session::{Session, SessionLock, SessionState};
use crate::settings::Settings;
use crate::{Error, Result};
use iconreg_fs::{NormalizedPath, PluginLayout, io};
use std::path::Path;
use std::process::Command;
use tokio::sync::oneshot;

/// Options for mutating operations
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationOptions {
    /// Compute the preview only; nothing is written or backed up
    pub dry_run: bool,
}

impl MutationOptions {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Result of a mutating operation
#[derive(Debug, Clone, Default)]
pub struct MutationOutcome {
    pub dry_run: bool,
    pub entries: Vec<EntryReport>,
    pub preview: PatchPreview,
    /// Checkpoint taken before writing, if anything was written
    pub backup: Option<BackupManifest>,
    pub written: Vec<NormalizedPath>,
    pub warnings: Vec<String>,
}

impl MutationOutcome {
    fn noop(options: MutationOptions) -> Self {
        Self {
            dry_run: options.dry_run,
            ..Self::default()
        }
    }

    /// Nothing to write and nothing that failed.
    pub fn is_noop(&self) -> bool {
        self.preview.is_empty() && self.failures().next().is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| e.is_failure())
    }
}

/// The two lines a resource needs, for manual registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub qualified_name: String,
    pub style_line: String,
    pub registry_line: String,
}

/// Result of the external build command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Session facade over one plugin
pub struct Registrar {
    layout: PluginLayout,
    settings: Settings,
    backups: BackupManager,
    lock: SessionLock,
    builds: JobSlot,
    session: Session,
}

impl Registrar {
    /// Open the plugin at `plugin_root`.
    ///
    /// The project root is `project` if given, else `settings.project_path`,
    /// else the first ancestor holding a `*.uproject` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial scan fails for a reason other than a
    /// missing directory or artifact.
    pub fn open(
        plugin_root: NormalizedPath,
        settings: Settings,
        project: Option<NormalizedPath>,
    ) -> Result<Self> {
        let project = project
            .or_else(|| settings.project_path.as_deref().map(NormalizedPath::new))
            .or_else(|| PluginLayout::detect_project(&plugin_root));
        let layout =
            PluginLayout::new(plugin_root, settings.plugin_name.clone()).with_project(project);
        let backups = BackupManager::new(layout.resolve(&settings.backup_dir));
        let session = Session::start(&layout, &settings)?;

        tracing::debug!(
            plugin = %layout.root(),
            project = ?layout.project_root().map(|p| p.as_str()),
            "registrar opened"
        );

        Ok(Self {
            layout,
            settings,
            backups,
            lock: SessionLock::new(),
            builds: JobSlot::new("build"),
            session,
        })
    }

    pub fn layout(&self) -> &PluginLayout {
        &self.layout
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Lock shared with a [`crate::monitor::ChangeMonitor`]
    pub fn lock(&self) -> &SessionLock {
        &self.lock
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn watch_set(&self) -> WatchSet {
        WatchSet::for_layout(&self.layout, &self.settings)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Rescan resources and artifacts.
    pub fn scan(&mut self) -> Result<&SessionState> {
        let lock = self.lock.clone();
        let _guard = lock.acquire();
        self.session.refresh(&self.layout, &self.settings)
    }

    pub fn reconcile(&self) -> Reconciliation {
        self.state().reconcile(&self.settings)
    }

    pub fn render_report(&self) -> Report {
        Report::build(&self.layout, &self.settings, self.state())
    }

    /// Write the current report under `report_dir`.
    pub fn write_report(&self) -> Result<NormalizedPath> {
        let report = self.render_report();
        let path = self
            .layout
            .resolve(&self.settings.report_dir)
            .join(report.file_name());
        io::write_text(&path, &report.render())?;
        tracing::info!(path = %path, "report written");
        Ok(path)
    }

    /// The two template lines for `name`.
    ///
    /// Fails if `name` cannot sit in the templates unescaped.
    pub fn snippet(&self, name: &str) -> Result<Snippet> {
        validate_name(name)?;
        let resource = ResourceEntity {
            name: name.to_string(),
            path: self.layout.resolve(&self.settings.resources_dir).join(format!(
                "{name}.{}",
                self.settings.icon_extension
            )),
            origin: Origin::Plugin,
        };
        Ok(Snippet {
            qualified_name: self.settings.qualified_name(name),
            style_line: ArtifactKind::StyleMapping.insert_line(&self.settings, &resource),
            registry_line: ArtifactKind::IconRegistry.insert_line(&self.settings, &resource),
        })
    }

    // ------------------------------------------------------------------
    // Registration mutations
    // ------------------------------------------------------------------

    /// Register every resource with no registration.
    pub fn add_missing(&mut self, options: MutationOptions) -> Result<MutationOutcome> {
        let lock = self.lock.clone();
        let _guard = lock.acquire();
        self.refresh()?;

        let reconciliation = self.reconcile();
        if reconciliation.missing.is_empty() {
            tracing::info!("no missing registrations");
            return Ok(MutationOutcome::noop(options));
        }

        let mut engine = TextPatchEngine::open(&self.layout, &self.settings, &ArtifactKind::ALL)?;
        let entries = engine.insert(&reconciliation.missing);
        let plan = engine.finish(entries);
        self.commit(plan, "add missing registrations", options)
    }

    /// Remove every namespace registration whose resource is gone.
    pub fn remove_orphaned(&mut self, options: MutationOptions) -> Result<MutationOutcome> {
        let lock = self.lock.clone();
        let _guard = lock.acquire();
        self.refresh()?;

        let reconciliation = self.reconcile();
        if reconciliation.orphaned.is_empty() {
            tracing::info!("no orphaned registrations");
            return Ok(MutationOutcome::noop(options));
        }

        let mut engine = TextPatchEngine::open(&self.layout, &self.settings, &ArtifactKind::ALL)?;
        let entries = engine.delete(&reconciliation.orphaned);
        let plan = engine.finish(entries);
        self.commit(plan, "remove orphaned registrations", options)
    }

    /// Remove orphans and add missing entries under one checkpoint.
    pub fn sync(&mut self, options: MutationOptions) -> Result<MutationOutcome> {
        let lock = self.lock.clone();
        let _guard = lock.acquire();
        self.refresh()?;

        let reconciliation = self.reconcile();
        if reconciliation.is_clean() {
            tracing::info!("registrations already in sync");
            return Ok(MutationOutcome::noop(options));
        }

        let mut engine = TextPatchEngine::open(&self.layout, &self.settings, &ArtifactKind::ALL)?;
        let mut entries = engine.delete(&reconciliation.orphaned);
        entries.extend(engine.insert(&reconciliation.missing));
        let plan = engine.finish(entries);
        self.commit(plan, "sync registrations", options)
    }

    /// Change the friendly name of `icon` in the icon registry.
    ///
    /// `icon` is a resource name or a qualified name. When `old` is `None`
    /// the currently registered friendly name is used.
    pub fn rename_friendly_name(
        &mut self,
        icon: &str,
        new: &str,
        old: Option<&str>,
        options: MutationOptions,
    ) -> Result<MutationOutcome> {
        let lock = self.lock.clone();
        let _guard = lock.acquire();
        self.refresh()?;

        let qualified = if icon.starts_with(&self.settings.namespace_prefix()) {
            icon.to_string()
        } else {
            self.settings.qualified_name(icon)
        };
        let old = match old {
            Some(old) => old.to_string(),
            None => self
                .state()
                .registrations
                .friendly_name(&qualified)
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidValue {
                    field: "icon".into(),
                    message: format!("{qualified} has no registered friendly name"),
                })?,
        };
        if old == new {
            return Ok(MutationOutcome::noop(options));
        }

        let mut engine =
            TextPatchEngine::open(&self.layout, &self.settings, &[ArtifactKind::IconRegistry])?;
        let entry = engine.rename(&qualified, &old, new)?;
        let plan = engine.finish(vec![entry]);
        self.commit(plan, &format!("rename {qualified} to {new}"), options)
    }

    // ------------------------------------------------------------------
    // Button configs
    // ------------------------------------------------------------------

    /// Apply `edit` to the button at `index` within `scope`.
    ///
    /// An icon that is not a registered friendly name is accepted with a
    /// warning in the outcome.
    pub fn edit_button(
        &mut self,
        scope: ConfigScope,
        index: usize,
        edit: &ButtonEdit,
        options: MutationOptions,
    ) -> Result<MutationOutcome> {
        let lock = self.lock.clone();
        let _guard = lock.acquire();
        self.refresh()?;

        let path = scope.path(&self.layout).ok_or_else(|| Error::InvalidValue {
            field: "scope".into(),
            message: format!("no project root, {scope} config unavailable"),
        })?;
        if !path.is_file() {
            return Err(Error::ArtifactMissing {
                path: path.to_native(),
            });
        }

        let before = io::read_text(&path)?;
        let model = ConfigModel::new(scope, &self.settings.plugin_name, path.to_native());
        let mut configs = model.parse(&before)?;
        let target = configs.get_mut(index).ok_or_else(|| Error::ButtonNotFound {
            scope: scope.to_string(),
            index,
        })?;
        edit.apply(target)?;

        let mut warnings = Vec::new();
        if let Some(icon) = &edit.icon
            && !icon.is_empty()
            && !self
                .state()
                .registrations
                .friendly_names()
                .values()
                .any(|friendly| friendly == icon)
        {
            tracing::warn!(icon = %icon, "icon is not a registered friendly name");
            warnings.push(format!("Icon `{icon}` is not a registered friendly name"));
        }

        let after = model.regenerate(&before, &configs)?;
        let plan = PatchPlan {
            changes: vec![FileChange {
                path,
                before,
                after,
            }],
            entries: Vec::new(),
        };
        let mut outcome =
            self.commit(plan, &format!("edit {scope} button {index}"), options)?;
        outcome.warnings = warnings;
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Backups
    // ------------------------------------------------------------------

    /// Manual checkpoint of every artifact.
    pub fn snapshot(&self, description: &str) -> Result<BackupManifest> {
        let _guard = self.lock.acquire();
        self.backups
            .snapshot(description, &self.layout.artifact_files())
    }

    pub fn list_backups(&self) -> Result<Vec<BackupManifest>> {
        self.backups.list()
    }

    pub fn get_backup(&self, backup_id: &str) -> Result<BackupManifest> {
        self.backups.get(backup_id)
    }

    /// Restore a backup, checkpointing the current files first.
    ///
    /// Per-file failures are reported, not raised; use
    /// [`RestoreReport::into_result`] to treat a partial restore as an error.
    pub fn restore_backup(&mut self, backup_id: &str) -> Result<RestoreReport> {
        let lock = self.lock.clone();
        let _guard = lock.acquire();

        let manifest = self.backups.get(backup_id)?;
        let originals: Vec<NormalizedPath> =
            manifest.files.iter().map(|f| f.original.clone()).collect();
        let checkpoint = self
            .backups
            .snapshot(&format!("before restore {backup_id}"), &originals)?;
        tracing::info!(backup = %checkpoint.backup_id, "checkpoint before restore");

        let report = self.backups.restore(&manifest);
        self.refresh()?;
        Ok(report)
    }

    pub fn delete_backup(&self, backup_id: &str) -> Result<bool> {
        self.backups.delete(backup_id)
    }

    // ------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------

    /// Copy an icon file into the plugin resources directory.
    ///
    /// # Errors
    ///
    /// [`Error::ResourceExists`] if a resource with the same file name is
    /// present and `force` is false.
    pub fn import_resource(&mut self, file: &Path, force: bool) -> Result<ResourceEntity> {
        let source = NormalizedPath::new(file);
        if !source.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {source}"),
            )));
        }
        let extension_ok = source
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.settings.icon_extension));
        let (Some(file_name), Some(name)) = (source.file_name(), source.file_stem()) else {
            return Err(Error::InvalidValue {
                field: "file".into(),
                message: format!("{source} has no file name"),
            });
        };
        if !extension_ok {
            return Err(Error::InvalidValue {
                field: "file".into(),
                message: format!("expected a .{} file", self.settings.icon_extension),
            });
        }
        validate_name(name)?;
        let (file_name, name) = (file_name.to_string(), name.to_string());

        let lock = self.lock.clone();
        let _guard = lock.acquire();

        let target = self
            .layout
            .resolve(&self.settings.resources_dir)
            .join(&file_name);
        if target.exists() && !force {
            return Err(Error::ResourceExists {
                path: target.to_native(),
            });
        }
        io::copy_file(&source, &target)?;
        tracing::info!(resource = %name, path = %target, "imported resource");

        self.refresh()?;
        Ok(ResourceEntity {
            name,
            path: target,
            origin: Origin::Plugin,
        })
    }

    // ------------------------------------------------------------------
    // Build job
    // ------------------------------------------------------------------

    /// Run `build_command` in the background.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidValue`] if no build command is configured,
    /// [`Error::Busy`] if a build is still running.
    pub fn start_build(&self) -> Result<oneshot::Receiver<Result<BuildOutput>>> {
        let Some((program, args)) = self.settings.build_command.split_first() else {
            return Err(Error::InvalidValue {
                field: "build_command".into(),
                message: "no build command configured".into(),
            });
        };
        let mut command = Command::new(program);
        command.args(args).current_dir(self.layout.root().to_native());

        self.builds.try_start(move || -> Result<BuildOutput> {
            let output = command.output()?;
            Ok(BuildOutput {
                success: output.status.success(),
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }

    pub fn is_building(&self) -> bool {
        self.builds.is_busy()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Caller holds the session lock.
    fn refresh(&mut self) -> Result<()> {
        self.session.refresh(&self.layout, &self.settings)?;
        Ok(())
    }

    /// Preview, checkpoint, write and rescan. Caller holds the session lock.
    fn commit(
        &mut self,
        plan: PatchPlan,
        description: &str,
        options: MutationOptions,
    ) -> Result<MutationOutcome> {
        let preview = plan.preview();
        let mut outcome = MutationOutcome {
            dry_run: options.dry_run,
            preview,
            ..MutationOutcome::default()
        };

        if options.dry_run || plan.is_noop() {
            tracing::debug!(dry_run = options.dry_run, "nothing written");
            outcome.entries = plan.entries;
            return Ok(outcome);
        }

        let changed: Vec<NormalizedPath> = plan.changed_files().into_iter().cloned().collect();
        let backup = self.backups.snapshot(description, &changed)?;
        tracing::info!(backup = %backup.backup_id, files = changed.len(), "checkpoint taken");

        outcome.written = plan.apply()?;
        outcome.backup = Some(backup);
        outcome.entries = plan.entries;
        self.refresh()?;
        Ok(outcome)
    }
}
