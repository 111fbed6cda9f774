//! Raw sensor frames and the temperature field derived from
//! them.
use std::io::{self, Read, Seek, SeekFrom};

use byteordered::ByteOrdered;
use ndarray::Array2;
use serde_derive::*;

use crate::{
    format::{IR_HEIGHT, IR_WIDTH},
    palette::ColorScale,
    temperature::{RadiometricConverter, ScaleRange},
};

/// Raw detector counts, indexed `(row, col)`.
pub type RawFrame = Array2<u16>;

/// Read `count` little-endian 16-bit samples starting at
/// `offset`.
pub fn read_samples<R: Read + Seek>(reader: &mut R, offset: u64, count: usize) -> io::Result<Vec<u16>> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut bytes = vec![0; 2 * count];
    reader.read_exact(&mut bytes)?;

    let mut rdr = ByteOrdered::le(&bytes[..]);
    (0..count).map(|_| rdr.read_u16()).collect()
}

/// Read the 320x240 IR block at `offset`.
pub fn read_raw_frame<R: Read + Seek>(reader: &mut R, offset: u64) -> io::Result<RawFrame> {
    let samples = read_samples(reader, offset, IR_WIDTH * IR_HEIGHT)?;
    Array2::from_shape_vec((IR_HEIGHT, IR_WIDTH), samples)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// A temperature together with the pixel it was observed at.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Extreme {
    pub temperature: f64,
    pub x: usize,
    pub y: usize,
}

pub struct TemperatureField {
    /// Celsius, indexed `(row, col)`.
    pub temperatures: Array2<f64>,
    pub min: Extreme,
    pub max: Extreme,
}

impl TemperatureField {
    /// Convert every sample of `frame`.
    ///
    /// Extremes are located on the raw counts (first occurrence
    /// in row-major order) and converted afterwards; the
    /// conversion is monotone so this agrees with the
    /// temperatures.
    pub fn from_raw(frame: &RawFrame, converter: &RadiometricConverter) -> Self {
        let temp_t = converter.temperature_transform();

        let mut min = (u16::MAX, 0, 0);
        let mut max = (u16::MIN, 0, 0);
        for ((row, col), &raw) in frame.indexed_iter() {
            if raw < min.0 {
                min = (raw, col, row);
            }
            if raw > max.0 {
                max = (raw, col, row);
            }
        }

        let extreme = |(raw, x, y): (u16, usize, usize)| Extreme {
            temperature: temp_t(raw),
            x,
            y,
        };

        TemperatureField {
            temperatures: frame.mapv(&temp_t),
            min: extreme(min),
            max: extreme(max),
        }
    }

    /// Palette range for this field.
    pub fn color_scale(&self, range: ScaleRange) -> ColorScale {
        match range {
            ScaleRange::Auto => ColorScale::new(self.min.temperature, self.max.temperature),
            ScaleRange::Manual { min, max } => ColorScale::new(min, max),
        }
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        let (ht, wid) = self.temperatures.dim();
        (wid, ht)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use anyhow::Result;

    use super::*;
    use crate::{format::FormatVariant, temperature::CalibrationParams};

    fn frame_bytes(offset: usize, value: impl Fn(usize, usize) -> u16) -> Vec<u8> {
        let mut bytes = vec![0xaa; offset];
        for row in 0..IR_HEIGHT {
            for col in 0..IR_WIDTH {
                bytes.extend_from_slice(&value(row, col).to_le_bytes());
            }
        }
        bytes
    }

    #[test]
    fn reads_row_major_little_endian() -> Result<()> {
        let bytes = frame_bytes(640, |row, col| (row * 1000 + col) as u16);
        let frame = read_raw_frame(&mut Cursor::new(bytes), 640)?;
        assert_eq!(frame.dim(), (IR_HEIGHT, IR_WIDTH));
        assert_eq!(frame[(0, 1)], 1);
        assert_eq!(frame[(2, 5)], 2005);
        assert_eq!(frame[(239, 319)], 239_319u32 as u16);
        Ok(())
    }

    #[test]
    fn short_block_is_an_error() {
        let mut bytes = frame_bytes(0, |_, _| 7);
        bytes.truncate(bytes.len() - 1);
        let err = read_raw_frame(&mut Cursor::new(bytes), 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn locates_first_extremes() -> Result<()> {
        let bytes = frame_bytes(0, |row, col| match (row, col) {
            (10, 20) | (200, 300) => 1500,
            (100, 5) | (150, 7) => 3000,
            _ => 2000,
        });
        let frame = read_raw_frame(&mut Cursor::new(bytes), 0)?;
        let conv = RadiometricConverter::new(
            FormatVariant::Legacy.layout().calibration,
            &CalibrationParams::default(),
        );
        let field = TemperatureField::from_raw(&frame, &conv);

        assert_eq!((field.min.x, field.min.y), (20, 10));
        assert_eq!((field.max.x, field.max.y), (5, 100));
        assert_eq!(field.min.temperature, conv.raw_to_temp(1500));
        assert_eq!(field.max.temperature, conv.raw_to_temp(3000));
        assert_eq!(field.temperatures[(150, 7)], field.max.temperature);
        assert_eq!(field.dimensions(), (IR_WIDTH, IR_HEIGHT));

        let auto = field.color_scale(ScaleRange::Auto);
        assert_eq!((auto.min, auto.max), (field.min.temperature, field.max.temperature));
        let manual = field.color_scale(ScaleRange::Manual { min: 20., max: 70. });
        assert_eq!((manual.min, manual.max), (20., 70.));
        Ok(())
    }
}
