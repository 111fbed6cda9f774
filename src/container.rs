//! The ZIP based IS2 layout.
//!
//! The archive is unpacked into a scratch directory that only
//! lives as long as the [`ContainerSource`]. Relevant
//! members:
//!
//! - `Images/Main/IR.data`: 640 byte header, then IR counts,
//!   320x240 u16 LE
//! - `Images/Main/028001E0.jpg`: visual photo, used as is
use std::{
    fs::{self, File},
    io::{self, BufReader, Read, Seek},
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use tracing::{debug, warn};
use zip::{result::ZipError, ZipArchive};

use crate::{
    convert::Is2Source,
    error::{io_error, Is2Error, Result},
    format::{base_name, FormatVariant, VariantLayout},
    frame::{read_raw_frame, RawFrame},
};

pub const IR_ENTRY: &str = "Images/Main/IR.data";
pub const VISUAL_ENTRY: &str = "Images/Main/028001E0.jpg";

/// Unpack every member of `archive` below `dest`.
///
/// All member names are checked before anything is written;
/// a name that would resolve outside `dest` (absolute, or
/// climbing out through `..`) aborts with
/// [`Is2Error::UnsafeArchiveEntry`].
pub fn extract_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, dest: &Path) -> Result<Vec<PathBuf>> {
    for idx in 0..archive.len() {
        let entry = archive.by_index(idx)?;
        if entry.enclosed_name().is_none() {
            return Err(Is2Error::UnsafeArchiveEntry(entry.name().to_string()));
        }
    }

    let mut extracted = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let mut entry = archive.by_index(idx)?;
        let out_path = match entry.enclosed_name() {
            Some(name) => dest.join(name),
            None => return Err(Is2Error::UnsafeArchiveEntry(entry.name().to_string())),
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(io_error(&out_path))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let mut out = File::create(&out_path).map_err(io_error(&out_path))?;
        io::copy(&mut entry, &mut out).map_err(io_error(&out_path))?;
        extracted.push(out_path);
    }
    Ok(extracted)
}

pub struct ContainerSource {
    dir: TempDir,
}

impl ContainerSource {
    /// Open `path` as a container, unpacking it into a fresh
    /// directory under `scratch` (the system temporary
    /// directory if `None`).
    ///
    /// Returns `None` if the file is not an archive or lacks
    /// the IR member. Errors after that point are fatal.
    pub fn try_open(path: &Path, scratch: Option<&Path>) -> Result<Option<Self>> {
        let file = File::open(path).map_err(io_error(path))?;
        let mut archive = match ZipArchive::new(BufReader::new(file)) {
            Ok(archive) => archive,
            Err(ZipError::Io(e)) => return Err(io_error(path)(e)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "not a container");
                return Ok(None);
            }
        };

        let prefix = format!("is2-{}-", base_name(path));
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match scratch {
            Some(scratch) => builder.tempdir_in(scratch).map_err(io_error(scratch))?,
            None => builder.tempdir().map_err(io_error(&std::env::temp_dir()))?,
        };
        debug!(dir = %dir.path().display(), "unpacking container");

        extract_archive(&mut archive, dir.path())?;
        if !dir.path().join(IR_ENTRY).is_file() {
            debug!(path = %path.display(), "archive has no {}", IR_ENTRY);
            return Ok(None);
        }

        Ok(Some(ContainerSource { dir }))
    }

    pub fn extraction_dir(&self) -> &Path {
        self.dir.path()
    }

    fn entry_path(&self, entry: &str) -> PathBuf {
        self.dir.path().join(entry)
    }
}

impl Is2Source for ContainerSource {
    fn layout(&self) -> VariantLayout {
        FormatVariant::Container.layout()
    }

    fn read_raw_frame(&mut self) -> Result<RawFrame> {
        let path = self.entry_path(IR_ENTRY);
        let mut file = BufReader::new(File::open(&path).map_err(io_error(&path))?);
        read_raw_frame(&mut file, self.layout().ir_offset).map_err(io_error(&path))
    }

    fn write_visual(&mut self, dest: &Path) -> Result<()> {
        let path = self.entry_path(VISUAL_ENTRY);
        fs::copy(&path, dest).map_err(io_error(&path))?;
        Ok(())
    }

    fn close(self) {
        let dir = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(dir = %dir.display(), "removed scratch directory"),
            Err(e) => warn!(dir = %dir.display(), error = %e, "could not remove scratch directory"),
        }
    }
}
