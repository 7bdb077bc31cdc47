//! Managed block delimiters

/// Shared by both markers; never allowed inside managed keys or values
pub const BLOCK_TAG: &str = "projectcfg managed block";

pub const BEGIN_MARKER: &str = "# >>> projectcfg managed block >>>";
pub const END_MARKER: &str = "# <<< projectcfg managed block <<<";

pub const NOTICE: &str = "# generated, edits between these markers are overwritten";

pub(crate) fn is_begin(line: &str) -> bool {
    line.trim() == BEGIN_MARKER
}

pub(crate) fn is_end(line: &str) -> bool {
    line.trim() == END_MARKER
}
