//! Voice annotation track of legacy files.
//!
//! The track is headerless little-endian PCM trailing the
//! image blocks. It is re-wrapped as a RIFF/WAVE file:
//!
//! - 0x00: "RIFF", u32 size of the rest of the file
//! - 0x08: "WAVE"
//! - 0x0c: "fmt " chunk, 16 bytes: format tag (1 = PCM),
//!   channels, sample rate, byte rate, block align, bits
//! - 0x24: "data", u32 payload length, samples
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};

use byteordered::ByteOrdered;

use crate::error::{io_error, Result};

pub const SAMPLE_RATE: u32 = 8000;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

const HEADER_LEN: u32 = 44;
const RIFF_SIZE_POS: u64 = 4;
const DATA_SIZE_POS: u64 = 40;

/// Streaming writer for 16-bit mono WAV data. Sizes are
/// patched into the header by [`WavWriter::finish`].
pub struct WavWriter<W: Write + Seek> {
    inner: W,
    data_len: u32,
}

impl<W: Write + Seek> WavWriter<W> {
    pub fn new(mut inner: W) -> io::Result<Self> {
        let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
        let mut wtr = ByteOrdered::le(&mut inner);
        wtr.write_all(b"RIFF")?;
        wtr.write_u32(HEADER_LEN - 8)?;
        wtr.write_all(b"WAVE")?;
        wtr.write_all(b"fmt ")?;
        wtr.write_u32(16)?;
        wtr.write_u16(1)?;
        wtr.write_u16(CHANNELS)?;
        wtr.write_u32(SAMPLE_RATE)?;
        wtr.write_u32(SAMPLE_RATE * block_align as u32)?;
        wtr.write_u16(block_align)?;
        wtr.write_u16(BITS_PER_SAMPLE)?;
        wtr.write_all(b"data")?;
        wtr.write_u32(0)?;
        Ok(WavWriter { inner, data_len: 0 })
    }

    pub fn write_sample(&mut self, sample: u16) -> io::Result<()> {
        ByteOrdered::le(&mut self.inner).write_u16(sample)?;
        self.data_len += 2;
        Ok(())
    }

    /// Number of samples written so far.
    pub fn len(&self) -> u32 {
        self.data_len / 2
    }

    pub fn is_empty(&self) -> bool {
        self.data_len == 0
    }

    pub fn finish(mut self) -> io::Result<W> {
        let end = self.inner.stream_position()?;
        self.inner.seek(SeekFrom::Start(RIFF_SIZE_POS))?;
        ByteOrdered::le(&mut self.inner).write_u32(HEADER_LEN - 8 + self.data_len)?;
        self.inner.seek(SeekFrom::Start(DATA_SIZE_POS))?;
        ByteOrdered::le(&mut self.inner).write_u32(self.data_len)?;
        self.inner.seek(SeekFrom::Start(end))?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Copy every 16-bit sample from `offset` to end of input
/// into a WAV file at `dest`. Returns the sample count.
///
/// End of input terminates the track; a dangling odd byte is
/// dropped. On any other failure the partial file is removed.
pub fn extract_audio<R: Read + Seek>(source: R, offset: u64, dest: &Path) -> Result<u32> {
    let written = write_track(source, offset, dest);
    if written.is_err() {
        let _ = fs::remove_file(dest);
    }
    written
}

fn write_track<R: Read + Seek>(mut source: R, offset: u64, dest: &Path) -> Result<u32> {
    source.seek(SeekFrom::Start(offset)).map_err(io_error(dest))?;
    let mut samples = ByteOrdered::le(BufReader::new(source));

    let file = File::create(dest).map_err(io_error(dest))?;
    let mut wav = WavWriter::new(BufWriter::new(file)).map_err(io_error(dest))?;
    loop {
        match samples.read_u16() {
            Ok(sample) => wav.write_sample(sample).map_err(io_error(dest))?,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(io_error(dest)(e)),
        }
    }

    let count = wav.len();
    wav.finish().map_err(io_error(dest))?;
    Ok(count)
}
