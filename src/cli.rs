//! Helpers to parse CLI arguments in the accompanying
//! binaries.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::path::{Path, PathBuf};

pub use clap::{App, Arg};
use indicatif::{ProgressBar, ProgressStyle};
pub use inflector::Inflector;
use tracing::info;

use crate::format::base_name;

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Which artifact an output path is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Infrared,
    Visual,
}

impl Artifact {
    fn suffix(self) -> &'static str {
        match self {
            Artifact::Infrared => "ir",
            Artifact::Visual => "vis",
        }
    }
}

/// Output file name for `input` when writing into a
/// directory: `<name>-ir.jpg` or `<name>-vis.jpg`, with the
/// `.is2` extension dropped.
pub fn friendly_name(input: &Path, artifact: Artifact) -> String {
    format!("{}-{}.jpg", base_name(input), artifact.suffix())
}

/// Resolve the user supplied `output` for `input`.
///
/// An empty value skips the artifact. An existing directory
/// receives a file named by [`friendly_name`]; any other
/// path is used as is (overwriting an existing file).
pub fn resolve_output(input: &Path, output: &str, artifact: Artifact) -> Option<PathBuf> {
    if output.is_empty() {
        return None;
    }

    let output = Path::new(output);
    if output.is_dir() {
        return Some(output.join(friendly_name(input, artifact)));
    }
    if output.exists() {
        info!(path = %output.display(), "overwriting existing file");
    } else {
        info!(path = %output.display(), "creating new file");
    }
    Some(output.to_path_buf())
}

pub fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );
    bar
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn friendly_names() {
        let input = Path::new("/cam/DCIM/IR_0012.IS2");
        assert_eq!(friendly_name(input, Artifact::Infrared), "IR_0012-ir.jpg");
        assert_eq!(friendly_name(input, Artifact::Visual), "IR_0012-vis.jpg");
        assert_eq!(friendly_name(Path::new("plain"), Artifact::Visual), "plain-vis.jpg");
    }

    #[test]
    fn resolves_directories_files_and_new_paths() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let input = Path::new("scan.is2");
        let as_str = |p: &Path| p.to_string_lossy().into_owned();

        assert_eq!(resolve_output(input, "", Artifact::Infrared), None);
        assert_eq!(
            resolve_output(input, &as_str(dir.path()), Artifact::Infrared),
            Some(dir.path().join("scan-ir.jpg"))
        );

        let existing = dir.path().join("keep.jpg");
        fs::write(&existing, b"old")?;
        assert_eq!(
            resolve_output(input, &as_str(&existing), Artifact::Visual),
            Some(existing.clone())
        );

        let fresh = dir.path().join("new.jpg");
        assert_eq!(
            resolve_output(input, &as_str(&fresh), Artifact::Visual),
            Some(fresh.clone())
        );
        assert!(!fresh.exists());
        Ok(())
    }
}
