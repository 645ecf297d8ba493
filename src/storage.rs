//! Per-application output directories.
//!
//! Every application owns `<base>/<id>/` for generated artifacts and
//! `<base>/<id>/upload/` for receipt scans. Artifacts are written to a
//! temporary file next to their final name and renamed once complete.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CollaboratorError, FormsError, Result};

pub const UPLOAD_DIR: &str = "upload";

const RECEIPT_SUFFIX: &str = "_receipt.pdf";

/// `HUB_003_receipt.pdf`
pub fn receipt_file_name(short: &str, number: u32) -> String {
    format!("{}_{:03}{RECEIPT_SUFFIX}", sanitize_filename::sanitize(short), number)
}

/// Sequence number of a receipt named by [`receipt_file_name`].
fn receipt_number(file_name: &str, prefix: &str) -> Option<u32> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(RECEIPT_SUFFIX)?
        .parse()
        .ok()
}

#[derive(Debug, Clone)]
pub struct OutputEnvironment {
    root: PathBuf,
    upload: PathBuf,
}

impl OutputEnvironment {
    /// Creates the directories for `entity_id` below `base`.
    ///
    /// Running this again for the same application is a no-op.
    pub fn prepare(base: &Path, entity_id: &str) -> Result<Self> {
        let id = entity_id.trim();
        if id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\'])
            || sanitize_filename::sanitize(id) != id
        {
            return Err(FormsError::InvalidInput(format!(
                "'{entity_id}' cannot be used as a directory name"
            )));
        }

        let root = base.join(id);
        let upload = root.join(UPLOAD_DIR);
        fs::create_dir_all(&upload).map_err(|e| FormsError::output(&upload, e))?;

        Ok(Self { root, upload })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload
    }

    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Runs `write` against a temporary path and moves the result to
    /// `file_name`. Nothing appears at the final path if `write` fails.
    pub fn persist_with<F>(&self, file_name: &str, write: F) -> Result<PathBuf>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let final_path = self.artifact_path(file_name);
        let suffix = Path::new(file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .suffix(&suffix)
            .tempfile_in(&self.root)
            .map_err(|e| FormsError::output(&final_path, e))?;

        write(partial.path())?;

        partial
            .persist(&final_path)
            .map_err(|e| FormsError::output(&final_path, e.error))?;
        log::info!("Wrote {}", final_path.display());
        Ok(final_path)
    }

    pub fn persist_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.persist_with(file_name, |path| {
            fs::write(path, bytes).map_err(|e| FormsError::output(path, e))
        })
    }

    /// Receipt scans of one teacher, ordered by receipt number.
    ///
    /// Scans without a number follow the numbered ones, ordered by name.
    pub fn receipts_for(&self, short: &str) -> Result<Vec<PathBuf>> {
        Ok(self
            .numbered_receipts(short)?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    fn numbered_receipts(&self, short: &str) -> Result<Vec<(Option<u32>, PathBuf)>> {
        let prefix = format!("{}_", sanitize_filename::sanitize(short));
        let entries = fs::read_dir(&self.upload).map_err(|e| CollaboratorError::Upload {
            path: self.upload.clone(),
            message: e.to_string(),
        })?;

        let mut receipts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CollaboratorError::Upload {
                path: self.upload.clone(),
                message: e.to_string(),
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix) && name.ends_with(".pdf") && entry.path().is_file() {
                receipts.push((receipt_number(&name, &prefix), entry.path()));
            }
        }
        receipts.sort_by(|(left_nr, left), (right_nr, right)| {
            let rank = |nr: &Option<u32>| nr.map_or((1, 0), |nr| (0, nr));
            rank(left_nr).cmp(&rank(right_nr)).then_with(|| left.cmp(right))
        });

        log::debug!("Found {} receipts for {} in {}", receipts.len(), short, self.upload.display());
        Ok(receipts)
    }

    /// Stores one more receipt for `short` and returns its path.
    pub fn store_receipt(&self, short: &str, bytes: &[u8]) -> Result<PathBuf> {
        let next = self
            .numbered_receipts(short)?
            .iter()
            .filter_map(|(nr, _)| *nr)
            .max()
            .unwrap_or(0)
            + 1;
        let name = receipt_file_name(short, next);
        let path = self.upload.join(&name);

        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .tempfile_in(&self.upload)
            .map_err(|e| FormsError::output(&path, e))?;
        fs::write(partial.path(), bytes).map_err(|e| FormsError::output(&path, e))?;
        partial
            .persist_noclobber(&path)
            .map_err(|e| FormsError::output(&path, e.error))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let first = OutputEnvironment::prepare(base.path(), "f0a1").unwrap();
        let second = OutputEnvironment::prepare(base.path(), "f0a1").unwrap();
        assert_eq!(first.root(), second.root());
        assert!(second.upload_dir().is_dir());
    }

    #[test]
    fn test_prepare_rejects_path_like_ids() {
        let base = tempfile::tempdir().unwrap();
        for id in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                OutputEnvironment::prepare(base.path(), id),
                Err(FormsError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let base = tempfile::tempdir().unwrap();
        let env = OutputEnvironment::prepare(base.path(), "app").unwrap();

        let result = env.persist_with("travel_invoice_HUB.xlsx", |_| {
            Err(FormsError::InvalidInput("boom".into()))
        });

        assert!(result.is_err());
        let left: Vec<_> = fs::read_dir(env.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(left, vec![std::ffi::OsString::from(UPLOAD_DIR)]);
    }

    #[test]
    fn test_receipts_by_prefix() {
        let base = tempfile::tempdir().unwrap();
        let env = OutputEnvironment::prepare(base.path(), "app").unwrap();
        env.store_receipt("HUB", b"%PDF-a").unwrap();
        env.store_receipt("HUBER", b"%PDF-b").unwrap();
        env.store_receipt("HUB", b"%PDF-c").unwrap();
        fs::write(env.upload_dir().join("HUB_notes.txt"), b"x").unwrap();

        let names: Vec<String> = env
            .receipts_for("HUB")
            .unwrap()
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["HUB_001_receipt.pdf", "HUB_002_receipt.pdf"]);
    }

    fn receipt_names(env: &OutputEnvironment, short: &str) -> Vec<String> {
        env.receipts_for(short)
            .unwrap()
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_store_receipt_after_removal() {
        let base = tempfile::tempdir().unwrap();
        let env = OutputEnvironment::prepare(base.path(), "app").unwrap();
        let first = env.store_receipt("HUB", b"%PDF-a").unwrap();
        env.store_receipt("HUB", b"%PDF-b").unwrap();
        fs::remove_file(first).unwrap();

        let third = env.store_receipt("HUB", b"%PDF-c").unwrap();

        assert!(third.ends_with("HUB_003_receipt.pdf"));
        assert_eq!(receipt_names(&env, "HUB"), ["HUB_002_receipt.pdf", "HUB_003_receipt.pdf"]);
    }

    #[test]
    fn test_receipts_ordered_by_number() {
        let base = tempfile::tempdir().unwrap();
        let env = OutputEnvironment::prepare(base.path(), "app").unwrap();
        for name in ["HUB_1000_receipt.pdf", "HUB_scan.pdf", "HUB_999_receipt.pdf", "HUB_010_receipt.pdf"] {
            fs::write(env.upload_dir().join(name), b"%PDF").unwrap();
        }

        assert_eq!(
            receipt_names(&env, "HUB"),
            ["HUB_010_receipt.pdf", "HUB_999_receipt.pdf", "HUB_1000_receipt.pdf", "HUB_scan.pdf"]
        );
        assert!(env
            .store_receipt("HUB", b"%PDF")
            .unwrap()
            .ends_with("HUB_1001_receipt.pdf"));
    }
}
