//! Artifact discovery.
//!
//! Walks the artifact root with every ignore filter disabled: hidden files
//! and `.gitignore`d paths are still artifacts. Directory entries are visited
//! in file-name order so the scan is the same on every filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::RegistryError;

/// Extensions recognized for model and feature artifacts.
pub const ARTIFACT_EXTENSIONS: [&str; 2] = [".pkl", ".joblib"];

/// Name fragments that mark a file as a model artifact.
pub const MODEL_MARKERS: [&str; 3] = ["model", "regressor", "classifier"];

/// Name fragment that marks a file as a feature-transform artifact.
pub const FEATURE_MARKER: &str = "feature";

fn has_artifact_extension(lower: &str) -> bool {
    ARTIFACT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Whether a file name designates a model artifact (case-insensitive).
#[must_use]
pub fn is_model_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    has_artifact_extension(&lower) && MODEL_MARKERS.iter().any(|m| lower.contains(m))
}

/// Whether a file name designates a feature-transform artifact. Model names
/// never qualify.
#[must_use]
pub fn is_feature_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    has_artifact_extension(&lower) && lower.contains(FEATURE_MARKER) && !is_model_name(name)
}

/// A model artifact found by the scan, with its partner feature artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub model_path: PathBuf,
    pub features_path: Option<PathBuf>,
}

/// Regular files, and symlinks whose target is a regular file. Directory
/// symlinks are never descended into.
fn is_artifact_file(entry: &ignore::DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file()),
        _ => false,
    }
}

/// Every artifact file under `root`, grouped by parent directory, each group
/// in file-name order.
fn files_by_dir(root: &Path) -> Result<BTreeMap<PathBuf, Vec<PathBuf>>, RegistryError> {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut dirs: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for entry in builder.build() {
        let entry = entry?;
        if !is_artifact_file(&entry) {
            continue;
        }
        let path = entry.into_path();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        dirs.entry(parent).or_default().push(path);
    }
    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First feature artifact among `siblings`, in the order given.
#[must_use]
pub fn find_partner_features(siblings: &[PathBuf]) -> Option<PathBuf> {
    siblings
        .iter()
        .find(|p| is_feature_name(&file_name(p)))
        .cloned()
}

/// Scan `root` for model artifacts and pair each with a feature artifact
/// from the same directory.
///
/// # Errors
///
/// Returns [`RegistryError::RootMissing`] if `root` is not a directory, or
/// [`RegistryError::Walk`] if traversal fails.
pub fn scan(root: &Path) -> Result<Vec<Discovered>, RegistryError> {
    if !root.is_dir() {
        return Err(RegistryError::RootMissing(root.to_path_buf()));
    }

    let mut found = Vec::new();
    for siblings in files_by_dir(root)?.values() {
        let partner = find_partner_features(siblings);
        for path in siblings.iter().filter(|p| is_model_name(&file_name(p))) {
            found.push(Discovered {
                model_path: path.clone(),
                features_path: partner.clone(),
            });
        }
    }
    tracing::debug!(root = %root.display(), models = found.len(), "artifact scan complete");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("xgboost_model.pkl", true)]
    #[case("RandomForestRegressor.JOBLIB", true)]
    #[case("svm_classifier.joblib", true)]
    #[case("feature_model.pkl", true)]
    #[case("xgboost_model.json", false)]
    #[case("xgboost_features.pkl", false)]
    #[case("model.pkl.bak", false)]
    #[case("notes.txt", false)]
    fn classifies_model_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_model_name(name), expected);
    }

    #[rstest]
    #[case("xgboost_features.pkl", true)]
    #[case("Feature_Pipeline.joblib", true)]
    #[case("feature_model.pkl", false)]
    #[case("x_FEATURE_model.pkl", false)]
    #[case("PREP_FEATURES.PKL", true)]
    #[case("features.csv", false)]
    fn classifies_feature_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_feature_name(name), expected);
    }

    #[test]
    fn partner_is_first_feature_file_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_features.pkl", "a_features.pkl", "m_model.pkl"] {
            fs::write(dir.path().join(name), b"{}").unwrap();
        }

        let found = scan(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].features_path.as_deref(),
            Some(dir.path().join("a_features.pkl").as_path())
        );
    }

    #[test]
    fn partner_search_is_per_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("x_features.pkl"), b"{}").unwrap();
        fs::write(dir.path().join("nested/knn_regressor.pkl"), b"{}").unwrap();

        let found = scan(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].features_path, None);
    }

    #[test]
    fn hidden_directories_are_scanned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache/lr_model.pkl"), b"{}").unwrap();

        assert_eq!(scan(dir.path()).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_count_but_symlinked_dirs_are_not_walked() {
        use std::os::unix::fs::symlink;

        let store = tempfile::tempdir().unwrap();
        fs::write(store.path().join("v3.pkl"), b"{}").unwrap();
        fs::write(store.path().join("v3_features.pkl"), b"{}").unwrap();
        fs::create_dir(store.path().join("more")).unwrap();
        fs::write(store.path().join("more/other_model.pkl"), b"{}").unwrap();

        let dir = tempfile::tempdir().unwrap();
        symlink(store.path().join("v3.pkl"), dir.path().join("current_model.pkl")).unwrap();
        symlink(store.path().join("v3_features.pkl"), dir.path().join("current_features.pkl"))
            .unwrap();
        symlink(store.path().join("more"), dir.path().join("linked")).unwrap();
        symlink(store.path().join("gone.pkl"), dir.path().join("dangling_model.pkl")).unwrap();

        let found = scan(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![Discovered {
                model_path: dir.path().join("current_model.pkl"),
                features_path: Some(dir.path().join("current_features.pkl")),
            }]
        );
    }

    #[test]
    fn missing_root_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("absent");
        assert!(matches!(scan(&root), Err(RegistryError::RootMissing(p)) if p == root));
    }
}
