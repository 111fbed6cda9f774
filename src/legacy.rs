//! The raw binary IS2 layout.
//!
//! There is no header. The blocks sit at fixed distances
//! from the end of the first run of 0xff padding bytes:
//!
//! - sentinel + 15828: IR counts, 320x240 u16 LE
//! - sentinel + 169484: visual photo, 640x480 RGB565 LE
//! - 784080 (absolute): voice annotation, PCM16 LE, 8 kHz,
//!   until end of file (only present in longer files)
use std::{
    ffi::OsString,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    audio::extract_audio,
    convert::Is2Source,
    error::{io_error, Is2Error, Result},
    format::{FormatVariant, VariantLayout},
    frame::{read_raw_frame, read_samples, RawFrame},
    render::encode_rgb,
    visual::{decode_rgb565_frame, VISUAL_HEIGHT, VISUAL_WIDTH},
};

/// Length of the 0xff run marking the sentinel.
pub const SENTINEL_RUN: usize = 20;
/// Bytes scanned for the sentinel before giving up.
pub const SCAN_LIMIT: usize = 1000;

pub const VISUAL_OFFSET: u64 = 169484;
pub const AUDIO_OFFSET: u64 = 784080;

/// Find the offset just past the first run of
/// [`SENTINEL_RUN`] consecutive 0xff bytes, looking at no
/// more than [`SCAN_LIMIT`] bytes.
pub fn find_sentinel(head: &[u8]) -> Result<u64> {
    let mut run = 0;
    for (idx, &byte) in head.iter().take(SCAN_LIMIT).enumerate() {
        run = if byte == 0xff { run + 1 } else { 0 };
        if run >= SENTINEL_RUN {
            return Ok(idx as u64 + 1);
        }
    }
    Err(Is2Error::OffsetNotFound)
}

/// Path of the audio sidecar for `source`: the full file
/// name with `.wav` appended.
pub fn audio_path(source: &Path) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(".wav");
    PathBuf::from(name)
}

pub struct LegacySource {
    path: PathBuf,
    file: BufReader<File>,
    len: u64,
    sentinel: u64,
}

impl LegacySource {
    /// Open `path` as a legacy file. Returns `None` if no
    /// sentinel is found.
    pub fn try_open(path: &Path) -> Result<Option<Self>> {
        let file = File::open(path).map_err(io_error(path))?;
        let len = file.metadata().map_err(io_error(path))?.len();

        let mut head = Vec::with_capacity(SCAN_LIMIT);
        (&file)
            .take(SCAN_LIMIT as u64)
            .read_to_end(&mut head)
            .map_err(io_error(path))?;

        let sentinel = match find_sentinel(&head) {
            Ok(offset) => offset,
            Err(Is2Error::OffsetNotFound) => {
                debug!(path = %path.display(), "no legacy sentinel");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        debug!(path = %path.display(), sentinel, "legacy sentinel found");

        Ok(Some(LegacySource {
            path: path.to_path_buf(),
            file: BufReader::new(file),
            len,
            sentinel,
        }))
    }

    pub fn sentinel(&self) -> u64 {
        self.sentinel
    }

    pub fn has_audio(&self) -> bool {
        self.len > AUDIO_OFFSET
    }
}

impl Is2Source for LegacySource {
    fn layout(&self) -> VariantLayout {
        FormatVariant::Legacy.layout()
    }

    fn read_raw_frame(&mut self) -> Result<RawFrame> {
        let offset = self.sentinel + self.layout().ir_offset;
        read_raw_frame(&mut self.file, offset).map_err(io_error(&self.path))
    }

    fn write_visual(&mut self, dest: &Path) -> Result<()> {
        let samples = read_samples(
            &mut self.file,
            self.sentinel + VISUAL_OFFSET,
            VISUAL_WIDTH * VISUAL_HEIGHT,
        )
        .map_err(io_error(&self.path))?;
        let image = decode_rgb565_frame(&samples, VISUAL_WIDTH, VISUAL_HEIGHT);
        encode_rgb(&image, dest)
    }

    fn write_audio(&mut self) -> Result<Option<PathBuf>> {
        if !self.has_audio() {
            return Ok(None);
        }
        let dest = audio_path(&self.path);
        let samples = extract_audio(&mut self.file, AUDIO_OFFSET, &dest)?;
        debug!(samples, "audio track extracted");
        Ok(Some(dest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_after_second_run() {
        let mut buf = vec![0xff; 19];
        buf.push(0x00);
        buf.extend_from_slice(&[0xff; 20]);
        buf.extend_from_slice(&[0x12; 100]);
        assert_eq!(find_sentinel(&buf).unwrap(), 40);
    }

    #[test]
    fn longer_run_stops_at_twentieth_byte() {
        let mut buf = vec![0x01, 0x02, 0x03];
        buf.extend_from_slice(&[0xff; 64]);
        assert_eq!(find_sentinel(&buf).unwrap(), 23);
    }

    #[test]
    fn run_ending_on_last_scanned_byte() {
        let mut buf = vec![0u8; SCAN_LIMIT - SENTINEL_RUN];
        buf.extend_from_slice(&[0xff; SENTINEL_RUN]);
        assert_eq!(find_sentinel(&buf).unwrap(), SCAN_LIMIT as u64);

        // one byte later is out of reach
        let mut buf = vec![0u8; SCAN_LIMIT - SENTINEL_RUN + 1];
        buf.extend_from_slice(&[0xff; SENTINEL_RUN]);
        assert!(matches!(find_sentinel(&buf), Err(Is2Error::OffsetNotFound)));
    }

    #[test]
    fn short_or_empty_input() {
        assert!(matches!(find_sentinel(&[]), Err(Is2Error::OffsetNotFound)));
        assert!(matches!(
            find_sentinel(&[0xff; 19]),
            Err(Is2Error::OffsetNotFound)
        ));
    }

    #[test]
    fn opens_only_with_sentinel() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let path = dir.path().join("short.is2");
        let mut bytes = vec![0x00; 5];
        bytes.extend_from_slice(&[0xff; SENTINEL_RUN]);
        bytes.extend_from_slice(&[0x42; 64]);
        std::fs::write(&path, &bytes)?;
        let source = LegacySource::try_open(&path)?.expect("legacy");
        assert_eq!(source.sentinel(), 25);
        assert!(!source.has_audio());

        let plain = dir.path().join("plain.is2");
        std::fs::write(&plain, vec![0x42; 4096])?;
        assert!(LegacySource::try_open(&plain)?.is_none());
        Ok(())
    }

    #[test]
    fn sidecar_keeps_full_name() {
        assert_eq!(
            audio_path(Path::new("/data/IR_0042.IS2")),
            PathBuf::from("/data/IR_0042.IS2.wav")
        );
    }
}
