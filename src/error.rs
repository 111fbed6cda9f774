use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::legacy::{SCAN_LIMIT, SENTINEL_RUN};

#[derive(Error, Debug)]
pub enum Is2Error {
    #[error("{}: unrecognized IS2 format (neither archive nor raw layout)", .0.display())]
    FormatUnrecognized(PathBuf),

    #[error("no run of {} 0xff bytes within the first {} bytes", SENTINEL_RUN, SCAN_LIMIT)]
    OffsetNotFound,

    #[error("archive entry `{0}` escapes the extraction directory")]
    UnsafeArchiveEntry(String),

    #[error("corrupt archive: {0}")]
    CorruptArchive(#[from] zip::result::ZipError),

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),
}

pub type Result<T> = std::result::Result<T, Is2Error>;

/// Wrap an [`io::Error`] with the path it happened on.
pub(crate) fn io_error(path: &Path) -> impl FnOnce(io::Error) -> Is2Error + '_ {
    move |source| Is2Error::Io {
        path: path.to_path_buf(),
        source,
    }
}
