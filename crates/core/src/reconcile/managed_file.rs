//! Managed block reconciliation
//!
//! A managed file holds at most one block delimited by [`BEGIN_MARKER`] and
//! [`END_MARKER`]. The block is owned by the engine and regenerated on every
//! run; every line outside of it belongs to the user and is kept verbatim and
//! in place. A file without a block gets one appended at the end.

use super::{
    atomic::write_atomically,
    markers::{BEGIN_MARKER, END_MARKER, NOTICE, is_begin, is_end},
    properties::{PropertySet, continues, property_key},
};
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Created,
    Updated,
    Unchanged,
}

impl FileStatus {
    pub fn is_drift(&self) -> bool {
        !matches!(self, FileStatus::Unchanged)
    }
}

/// Reconciled content of one file, computed but not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    pub path: PathBuf,
    pub status: FileStatus,
    pub content: String,
}

impl FilePlan {
    /// md5 of the reconciled content
    pub fn fingerprint(&self) -> String {
        format!("{:x}", md5::compute(self.content.as_bytes()))
    }
}

/// Whether reconciled content is written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    #[default]
    Write,
    /// Compute and report only
    Check,
}

#[derive(Debug, Clone, Default)]
pub struct ManagedFileReconciler {
    mode: WriteMode,
}

/// An existing file split around its managed block.
///
/// Lines keep their own terminators so unmanaged content is reproduced
/// byte for byte.
struct SplitFile<'a> {
    before: Vec<&'a str>,
    block: Option<Vec<&'a str>>,
    after: Vec<&'a str>,
    eol: &'static str,
}

impl ManagedFileReconciler {
    pub fn new(mode: WriteMode) -> Self {
        Self { mode }
    }

    /// Compute the reconciled content of `path` without touching the disk
    pub fn plan(&self, path: &Path, properties: &PropertySet) -> Result<FilePlan> {
        properties.validate(path)?;

        let current = match std::fs::read(path) {
            Ok(bytes) => Some(String::from_utf8(bytes).map_err(|_| {
                Error::reconciliation(path, "existing file is not valid UTF-8")
            })?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let Some(current) = current else {
            return Ok(FilePlan {
                path: path.to_path_buf(),
                status: FileStatus::Created,
                content: render_block(properties, "\n"),
            });
        };

        let split = split_managed(path, &current)?;
        check_unmanaged_collisions(path, &split.before, properties)?;
        check_unmanaged_collisions(path, &split.after, properties)?;

        let block = render_block(properties, split.eol);
        let mut content = split.before.concat();
        if split.block.is_none() {
            if !content.is_empty() && !content.ends_with('\n') {
                content.push_str(split.eol);
            }
            if split.before.last().is_some_and(|l| !text(l).trim().is_empty()) {
                content.push_str(split.eol);
            }
        }
        content.push_str(&block);
        content.push_str(&split.after.concat());

        let status = if content == current {
            FileStatus::Unchanged
        } else {
            FileStatus::Updated
        };

        Ok(FilePlan {
            path: path.to_path_buf(),
            status,
            content,
        })
    }

    /// Converge `path` toward `properties`, writing only when content changes
    pub fn reconcile(&self, path: &Path, properties: &PropertySet) -> Result<FilePlan> {
        let plan = self.plan(path, properties)?;

        match (plan.status, self.mode) {
            (FileStatus::Unchanged, _) => {
                debug!(path = %path.display(), "managed file up to date");
            }
            (status, WriteMode::Check) => {
                info!(path = %path.display(), ?status, "managed file has drifted");
            }
            (status, WriteMode::Write) => {
                write_atomically(path, plan.content.as_bytes())?;
                info!(path = %path.display(), ?status, "managed file written");
            }
        }

        Ok(plan)
    }

    /// Converge a file the engine owns completely, such as a materialized
    /// ruleset. There is no managed block; the whole content is replaced.
    pub fn reconcile_owned(&self, path: &Path, content: &str) -> Result<FilePlan> {
        let status = match std::fs::read(path) {
            Ok(bytes) if bytes == content.as_bytes() => FileStatus::Unchanged,
            Ok(_) => FileStatus::Updated,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileStatus::Created,
            Err(e) => return Err(e.into()),
        };

        if status.is_drift() && self.mode == WriteMode::Write {
            write_atomically(path, content.as_bytes())?;
            info!(path = %path.display(), ?status, "generated file written");
        }

        Ok(FilePlan {
            path: path.to_path_buf(),
            status,
            content: content.to_string(),
        })
    }
}

fn render_block(properties: &PropertySet, eol: &str) -> String {
    let mut out = String::new();
    let lines = [BEGIN_MARKER.to_string(), NOTICE.to_string()]
        .into_iter()
        .chain(properties.iter().map(|(k, v)| format!("{k}={v}")))
        .chain(std::iter::once(END_MARKER.to_string()));
    for line in lines {
        out.push_str(&line);
        out.push_str(eol);
    }
    out
}

/// A raw line without its terminator
fn text(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn split_managed<'a>(path: &Path, content: &'a str) -> Result<SplitFile<'a>> {
    let eol = match content.find('\n') {
        Some(idx) if content[..idx].ends_with('\r') => "\r\n",
        _ => "\n",
    };
    let mut split = SplitFile {
        before: Vec::new(),
        block: None,
        after: Vec::new(),
        eol,
    };
    let mut inside = false;

    for (idx, raw) in content.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let line = text(raw);
        if is_begin(line) {
            if inside || split.block.is_some() {
                return Err(Error::reconciliation(
                    path,
                    format!("unexpected second managed block at line {line_no}"),
                ));
            }
            inside = true;
            split.block = Some(vec![raw]);
        } else if is_end(line) {
            if !inside {
                return Err(Error::reconciliation(
                    path,
                    format!("managed block end marker without start at line {line_no}"),
                ));
            }
            inside = false;
            if let Some(block) = split.block.as_mut() {
                block.push(raw);
            }
        } else if inside {
            if let Some(block) = split.block.as_mut() {
                block.push(raw);
            }
        } else if split.block.is_some() {
            split.after.push(raw);
        } else {
            split.before.push(raw);
        }
    }

    if inside {
        return Err(Error::reconciliation(path, "managed block is not terminated"));
    }

    Ok(split)
}

/// Reject unmanaged keys that a managed key would shadow.
///
/// Each region is checked on its own; a continuation never crosses the block.
fn check_unmanaged_collisions(path: &Path, region: &[&str], properties: &PropertySet) -> Result<()> {
    let mut continued = false;

    for raw in region {
        let line = text(raw);
        let is_continuation = continued;
        continued = continues(line);
        if is_continuation {
            continue;
        }

        if let Some(key) = property_key(line) {
            if properties.contains_key(key) {
                return Err(Error::reconciliation(
                    path,
                    format!("key '{key}' is set outside the managed block"),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn props() -> PropertySet {
        PropertySet::new()
            .with("server.port", "8080")
            .with("server.shutdown", "graceful")
    }

    fn reconcile(path: &Path, properties: &PropertySet) -> FilePlan {
        ManagedFileReconciler::default().reconcile(path, properties).unwrap()
    }

    #[test]
    fn test_creates_missing_file_with_block_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("src/main/resources/application.properties");

        let plan = reconcile(&path, &props());

        assert_eq!(plan.status, FileStatus::Created);
        insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r"
        # >>> projectcfg managed block >>>
        # generated, edits between these markers are overwritten
        server.port=8080
        server.shutdown=graceful
        # <<< projectcfg managed block <<<
        ");
    }

    #[test]
    fn test_second_run_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");

        reconcile(&path, &props());
        let first = fs::read(&path).unwrap();
        let plan = reconcile(&path, &props());

        assert_eq!(plan.status, FileStatus::Unchanged);
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_appends_block_to_hand_written_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        fs::write(&path, "# mine\ncustom.a=1\ncustom.b=2").unwrap();

        let plan = reconcile(&path, &props());

        assert_eq!(plan.status, FileStatus::Updated);
        insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r"
        # mine
        custom.a=1
        custom.b=2

        # >>> projectcfg managed block >>>
        # generated, edits between these markers are overwritten
        server.port=8080
        server.shutdown=graceful
        # <<< projectcfg managed block <<<
        ");
    }

    #[test]
    fn test_stale_block_converges_and_surroundings_stay() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        fs::write(
            &path,
            format!(
                "top=1\n{BEGIN_MARKER}\nold.key=x\nserver.port=9999\n{END_MARKER}\nbottom=2\n"
            ),
        )
        .unwrap();

        let generated = PropertySet::new()
            .with("server.port", "8080")
            .with("new.key", "y");
        reconcile(&path, &generated);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!("top=1\n{BEGIN_MARKER}\n{NOTICE}\nserver.port=8080\nnew.key=y\n{END_MARKER}\nbottom=2\n")
        );
    }

    #[test]
    fn test_check_mode_reports_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");

        let plan = ManagedFileReconciler::new(WriteMode::Check)
            .reconcile(&path, &props())
            .unwrap();

        assert_eq!(plan.status, FileStatus::Created);
        assert!(plan.status.is_drift());
        assert!(!path.exists());
    }

    #[test]
    fn test_unmanaged_key_collision_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        fs::write(&path, "server.port = 9000\n").unwrap();

        let err = ManagedFileReconciler::default()
            .reconcile(&path, &props())
            .unwrap_err();

        assert!(matches!(err, Error::Reconciliation { .. }));
        assert!(err.to_string().contains("server.port"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "server.port = 9000\n");
    }

    #[test]
    fn test_continuation_lines_are_not_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        fs::write(&path, "custom.list=a,\\\nserver.port\n").unwrap();

        let plan = reconcile(&path, &props());
        assert_eq!(plan.status, FileStatus::Updated);
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        fs::write(&path, format!("{BEGIN_MARKER}\na=1\n")).unwrap();

        let err = ManagedFileReconciler::default()
            .reconcile(&path, &props())
            .unwrap_err();
        assert!(err.to_string().contains("not terminated"));
    }

    #[test]
    fn test_two_blocks_are_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        let block = format!("{BEGIN_MARKER}\n{END_MARKER}\n");
        fs::write(&path, format!("{block}{block}")).unwrap();

        assert!(ManagedFileReconciler::default().plan(&path, &props()).is_err());
    }

    #[test]
    fn test_owned_file_is_replaced_only_on_change() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tmp/checkstyle.xml");
        let reconciler = ManagedFileReconciler::default();

        assert_eq!(reconciler.reconcile_owned(&path, "<a/>").unwrap().status, FileStatus::Created);
        assert_eq!(reconciler.reconcile_owned(&path, "<a/>").unwrap().status, FileStatus::Unchanged);
        assert_eq!(reconciler.reconcile_owned(&path, "<b/>").unwrap().status, FileStatus::Updated);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<b/>");
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");

        let first = reconcile(&path, &props());
        let second = reconcile(&path, &props());
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.fingerprint().len(), 32);
    }

    #[test]
    fn test_crlf_file_keeps_its_line_endings_when_block_is_appended() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        let user = "custom.a=1\r\ncustom.b=2\r\n";
        fs::write(&path, user).unwrap();

        reconcile(&path, &PropertySet::new().with("server.port", "8080"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!("{user}\r\n{BEGIN_MARKER}\r\n{NOTICE}\r\nserver.port=8080\r\n{END_MARKER}\r\n")
        );
        let plan = reconcile(&path, &PropertySet::new().with("server.port", "8080"));
        assert_eq!(plan.status, FileStatus::Unchanged);
    }

    #[test]
    fn test_crlf_file_with_block_is_refreshed_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        fs::write(
            &path,
            format!("top=1\r\n{BEGIN_MARKER}\r\nserver.port=9999\r\n{END_MARKER}\r\nbottom=2\r\n"),
        )
        .unwrap();

        reconcile(&path, &PropertySet::new().with("server.port", "8080"));

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("top=1\r\n{BEGIN_MARKER}\r\n{NOTICE}\r\nserver.port=8080\r\n{END_MARKER}\r\nbottom=2\r\n")
        );
    }

    #[test]
    fn test_mixed_line_endings_outside_block_are_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        let user = "a=1\nb=2\r\nc=3";
        fs::write(&path, user).unwrap();

        reconcile(&path, &props());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("a=1\nb=2\r\nc=3\n\n"));
        assert!(content.ends_with(&format!("{END_MARKER}\n")));
    }

    #[test]
    fn test_trailing_backslash_value_is_rejected_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        let generated = PropertySet::new().with("a.dir", "C:\\tmp\\").with("b", "1");

        let err = ManagedFileReconciler::default()
            .reconcile(&path, &generated)
            .unwrap_err();

        assert!(matches!(err, Error::Reconciliation { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_continuation_does_not_cross_the_block() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.properties");
        fs::write(
            &path,
            format!("x=1\\\n{BEGIN_MARKER}\n{END_MARKER}\nserver.port=9\n"),
        )
        .unwrap();

        let err = ManagedFileReconciler::default()
            .reconcile(&path, &props())
            .unwrap_err();

        assert!(matches!(err, Error::Reconciliation { .. }));
        assert!(err.to_string().contains("server.port"));
    }
}
