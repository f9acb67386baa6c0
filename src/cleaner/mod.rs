//! Build-flag cleaner.
//!
//! Removes flags with a disallowed prefix from selected list settings of
//! selected targets, and saves the project only when something was
//! removed.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::{DEFAULT_KEYS, DEFAULT_PREFIX, DEFAULT_TARGETS};
use crate::store::{ProjectModel, ProjectStore, SettingValue, StoreError};

/// Which flags to strip, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRules {
    /// Target names, matched exactly.
    pub targets: Vec<String>,
    /// Build setting keys to filter.
    pub keys: Vec<String>,
    pub prefix: String,
}

impl Default for FlagRules {
    fn default() -> Self {
        Self {
            targets: DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect(),
            keys: DEFAULT_KEYS.iter().map(|s| s.to_string()).collect(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// One filtered (target, configuration, key) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagChange {
    pub target: String,
    pub configuration: String,
    pub key: String,
    pub removed: Vec<String>,
    pub kept: usize,
}

/// Outcome of a cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub project: PathBuf,
    pub prefix: String,
    /// Matching targets that were inspected, in project order.
    pub targets: Vec<String>,
    pub changes: Vec<FlagChange>,
    /// Whether the project was written back.
    pub saved: bool,
    pub dry_run: bool,
}

impl CleanReport {
    pub fn modified(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Human-readable lines: per-target progress, one notice per change,
    /// and a closing summary.
    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for target in &self.targets {
            lines.push(format!("Processing target: {}", target));
            for change in self.changes.iter().filter(|c| &c.target == target) {
                lines.push(format!(
                    "  Fixed {} in {} configuration (removed {})",
                    change.key,
                    change.configuration,
                    change.removed.join(" ")
                ));
            }
        }

        let summary = if !self.modified() {
            format!("No '{}' flag issues found in the project.", self.prefix)
        } else if self.dry_run {
            format!(
                "Would fix '{}' flag issues in {} (dry run, nothing written)",
                self.prefix,
                self.project.display()
            )
        } else {
            format!(
                "Successfully fixed '{}' flag issues in {}",
                self.prefix,
                self.project.display()
            )
        };
        lines.push(summary);
        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Keep the flags that do not start with `prefix`, preserving order.
pub fn filter_flags(flags: &[String], prefix: &str) -> Vec<String> {
    flags
        .iter()
        .filter(|flag| !flag.starts_with(prefix))
        .cloned()
        .collect()
}

/// Apply the rules to a model in place and describe what changed.
///
/// Settings that are absent or not lists are left alone.
pub fn strip_flags(model: &mut ProjectModel, rules: &FlagRules) -> Vec<FlagChange> {
    let mut changes = Vec::new();
    for target in model
        .targets
        .iter_mut()
        .filter(|t| rules.targets.contains(&t.name))
    {
        for config in &mut target.configurations {
            for key in &rules.keys {
                let Some(setting) = config.settings.get_mut(key) else {
                    continue;
                };
                let SettingValue::List(flags) = setting else {
                    log::debug!(
                        "{} ({}): {} is not a list, skipping",
                        target.name,
                        config.name,
                        key
                    );
                    continue;
                };

                let kept = filter_flags(flags, &rules.prefix);
                if kept.len() == flags.len() {
                    continue;
                }
                let removed: Vec<String> = flags
                    .iter()
                    .filter(|flag| flag.starts_with(&rules.prefix))
                    .cloned()
                    .collect();
                changes.push(FlagChange {
                    target: target.name.clone(),
                    configuration: config.name.clone(),
                    key: key.clone(),
                    removed,
                    kept: kept.len(),
                });
                *flags = kept;
            }
        }
    }
    changes
}

/// Run the cleaner against a store.
///
/// A missing document fails before anything is read. The store is saved
/// only if at least one flag was removed and `dry_run` is false.
pub fn clean_project<S: ProjectStore>(
    store: &mut S,
    rules: &FlagRules,
    dry_run: bool,
) -> Result<CleanReport, StoreError> {
    if !store.exists() {
        return Err(StoreError::NotFound(store.location().to_path_buf()));
    }

    let mut model = store.load()?;
    let targets: Vec<String> = model
        .targets
        .iter()
        .filter(|t| rules.targets.contains(&t.name))
        .map(|t| t.name.clone())
        .collect();
    if targets.is_empty() {
        log::warn!(
            "none of the targets {:?} exist in {}",
            rules.targets,
            store.location().display()
        );
    }

    let changes = strip_flags(&mut model, rules);
    let saved = !changes.is_empty() && !dry_run;
    if saved {
        store.save(&model)?;
    }

    Ok(CleanReport {
        project: store.location().to_path_buf(),
        prefix: rules.prefix.clone(),
        targets,
        changes,
        saved,
        dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BuildConfiguration, MemoryStore, Target};

    fn flags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn grpc_model() -> ProjectModel {
        ProjectModel {
            targets: vec![
                Target::new("T1", "gRPC-Core")
                    .with_configuration(
                        BuildConfiguration::new("C1", "Debug")
                            .with_list("OTHER_LDFLAGS", &["$(inherited)", "-G", "-ObjC"])
                            .with_list("OTHER_CFLAGS", &["-GCC_WARN", "-DNDEBUG"]),
                    )
                    .with_configuration(
                        BuildConfiguration::new("C2", "Release")
                            .with_list("OTHER_LDFLAGS", &["$(inherited)", "-ObjC"]),
                    ),
                Target::new("T2", "Pods-App").with_configuration(
                    BuildConfiguration::new("C3", "Debug").with_list("OTHER_LDFLAGS", &["-G"]),
                ),
                Target::new("T3", "BoringSSL-GRPC").with_configuration(
                    BuildConfiguration::new("C4", "Release")
                        .with_text("OTHER_CFLAGS", "-G -O2")
                        .with_list("OTHER_LDFLAGS", &["-G0", "-lz", "-G1"]),
                ),
            ],
        }
    }

    #[test]
    fn test_filter_flags_preserves_order() {
        let result = filter_flags(&flags(&["a", "-G", "b", "-Gx", "c"]), "-G");
        assert_eq!(result, flags(&["a", "b", "c"]));
    }

    #[test]
    fn test_filter_flags_is_idempotent() {
        let once = filter_flags(&flags(&["-G", "-ObjC", "-G3", "-lc++"]), "-G");
        let twice = filter_flags(&once, "-G");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_flags_is_case_sensitive() {
        assert_eq!(filter_flags(&flags(&["-g", "-G"]), "-G"), flags(&["-g"]));
    }

    #[test]
    fn test_strip_only_named_targets() {
        let mut model = grpc_model();
        let changes = strip_flags(&mut model, &FlagRules::default());

        assert_eq!(changes.len(), 3);
        assert_eq!(
            changes[0],
            FlagChange {
                target: "gRPC-Core".to_string(),
                configuration: "Debug".to_string(),
                key: "OTHER_LDFLAGS".to_string(),
                removed: flags(&["-G"]),
                kept: 2,
            }
        );
        assert_eq!(changes[1].key, "OTHER_CFLAGS");
        assert_eq!(changes[1].removed, flags(&["-GCC_WARN"]));
        assert_eq!(changes[2].target, "BoringSSL-GRPC");
        assert_eq!(changes[2].removed, flags(&["-G0", "-G1"]));

        // Untargeted project keeps its flag
        let app = model.target("Pods-App").unwrap();
        assert_eq!(
            app.configurations[0].settings["OTHER_LDFLAGS"],
            SettingValue::List(flags(&["-G"]))
        );
        // Scalar settings are not touched
        let boring = model.target("BoringSSL-GRPC").unwrap();
        assert_eq!(
            boring.configurations[0].settings["OTHER_CFLAGS"],
            SettingValue::Text("-G -O2".to_string())
        );
        assert_eq!(
            boring.configurations[0].settings["OTHER_LDFLAGS"],
            SettingValue::List(flags(&["-lz"]))
        );
    }

    #[test]
    fn test_clean_saves_once_when_modified() {
        let mut store = MemoryStore::new(grpc_model());
        let report = clean_project(&mut store, &FlagRules::default(), false).unwrap();

        assert!(report.modified());
        assert!(report.saved);
        assert_eq!(report.targets, vec!["gRPC-Core", "BoringSSL-GRPC"]);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut store = MemoryStore::new(grpc_model());
        clean_project(&mut store, &FlagRules::default(), false).unwrap();
        let after_first = store.model().cloned();

        let report = clean_project(&mut store, &FlagRules::default(), false).unwrap();
        assert!(!report.modified());
        assert!(!report.saved);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.model().cloned(), after_first);
    }

    #[test]
    fn test_clean_without_matches_does_not_save() {
        let rules = FlagRules {
            prefix: "-Wno".to_string(),
            ..FlagRules::default()
        };
        let mut store = MemoryStore::new(grpc_model());
        let report = clean_project(&mut store, &rules, false).unwrap();
        assert!(!report.modified());
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.model(), Some(&grpc_model()));
    }

    #[test]
    fn test_dry_run_does_not_save() {
        let mut store = MemoryStore::new(grpc_model());
        let report = clean_project(&mut store, &FlagRules::default(), true).unwrap();
        assert!(report.modified());
        assert!(!report.saved);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let mut store = MemoryStore::missing();
        let err = clean_project(&mut store, &FlagRules::default(), false).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_human_report() {
        let mut store = MemoryStore::new(grpc_model());
        let report = clean_project(&mut store, &FlagRules::default(), false).unwrap();
        let text = report.to_human();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Processing target: gRPC-Core");
        assert_eq!(
            lines[1],
            "  Fixed OTHER_LDFLAGS in Debug configuration (removed -G)"
        );
        assert!(lines
            .last()
            .unwrap()
            .starts_with("Successfully fixed '-G' flag issues in"));

        let report = clean_project(&mut store, &FlagRules::default(), false).unwrap();
        assert!(report
            .to_human()
            .ends_with("No '-G' flag issues found in the project."));
    }

    #[test]
    fn test_json_report() {
        let mut store = MemoryStore::new(grpc_model());
        let report = clean_project(&mut store, &FlagRules::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["saved"], false);
        assert_eq!(value["changes"][0]["removed"][0], "-G");
    }
}
