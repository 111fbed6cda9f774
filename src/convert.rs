//! Format detection and the shared conversion pipeline.
//!
//! Both layouts are driven through [`Is2Source`]; only the
//! [`VariantLayout`] and the way the side artifacts are
//! produced differ.
use std::path::{Path, PathBuf};

use serde_derive::*;
use tracing::{debug, info, warn};

use crate::{
    container::ContainerSource,
    error::{Is2Error, Result},
    format::{FormatVariant, VariantLayout},
    frame::{Extreme, RawFrame, TemperatureField},
    legacy::LegacySource,
    palette::ColorScale,
    render::{compose, encode_rgb},
    temperature::{CalibrationParams, RadiometricConverter, ScaleRange},
};

/// A detected IS2 file, ready to be decoded.
pub trait Is2Source {
    fn layout(&self) -> VariantLayout;

    fn read_raw_frame(&mut self) -> Result<RawFrame>;

    /// Write the visual photo to `dest`.
    fn write_visual(&mut self, dest: &Path) -> Result<()>;

    /// Write the voice annotation, if the file has one, and
    /// return where it went.
    fn write_audio(&mut self) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    /// Release held resources.
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// One conversion request.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub source: PathBuf,
    /// Destination of the annotated infrared image. Skipped if
    /// `None`.
    pub ir_output: Option<PathBuf>,
    /// Destination of the visual photo. Skipped if `None`.
    pub visual_output: Option<PathBuf>,
    pub params: CalibrationParams,
    /// Parent of the container scratch directory (the system
    /// temporary directory if `None`).
    pub scratch_dir: Option<PathBuf>,
}

impl Conversion {
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        Conversion {
            source: source.into(),
            ir_output: None,
            visual_output: None,
            params: CalibrationParams::default(),
            scratch_dir: None,
        }
    }

    pub fn ir_output<P: Into<PathBuf>>(mut self, dest: P) -> Self {
        self.ir_output = Some(dest.into());
        self
    }

    pub fn visual_output<P: Into<PathBuf>>(mut self, dest: P) -> Self {
        self.visual_output = Some(dest.into());
        self
    }

    pub fn params(mut self, params: CalibrationParams) -> Self {
        self.params = params;
        self
    }

    pub fn scratch_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}

/// Outcome of a successful conversion.
#[derive(Serialize, Debug, Clone)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub variant: FormatVariant,
    pub min: Extreme,
    pub max: Extreme,
    /// Range the palette was stretched over.
    pub scale: ColorScale,
    pub scale_mode: ScaleRange,
    pub ir_output: Option<PathBuf>,
    pub visual_output: Option<PathBuf>,
    pub audio_output: Option<PathBuf>,
}

/// Detect the layout of `request.source` and produce the
/// requested artifacts.
///
/// The container layout is tried first. Once a layout is
/// detected, any later failure is returned as is; the other
/// layout is not attempted.
pub fn convert(request: &Conversion) -> Result<ConversionReport> {
    let path = &request.source;

    if let Some(source) = ContainerSource::try_open(path, request.scratch_dir.as_deref())? {
        return run(source, request);
    }
    if let Some(source) = LegacySource::try_open(path)? {
        return run(source, request);
    }

    debug!(path = %path.display(), "no layout matched");
    Err(Is2Error::FormatUnrecognized(path.clone()))
}

fn run<S: Is2Source>(mut source: S, request: &Conversion) -> Result<ConversionReport> {
    let report = produce(&mut source, request);
    source.close();
    report
}

fn produce<S: Is2Source>(source: &mut S, request: &Conversion) -> Result<ConversionReport> {
    let layout = source.layout();
    info!(path = %request.source.display(), variant = %layout.variant, "detected format");

    let frame = source.read_raw_frame()?;
    let converter = RadiometricConverter::new(layout.calibration, &request.params);
    let field = TemperatureField::from_raw(&frame, &converter);
    info!(
        min = field.min.temperature,
        min_x = field.min.x,
        min_y = field.min.y,
        max = field.max.temperature,
        max_x = field.max.x,
        max_y = field.max.y,
        "temperature range"
    );

    let scale_mode = request.params.scale();
    match scale_mode {
        ScaleRange::Auto => info!("automatic scale"),
        ScaleRange::Manual { min, max } => info!(min, max, "manual scale"),
    }
    info!(
        background = request.params.background_temperature(),
        emissivity = request.params.emissivity(),
        "correction parameters"
    );
    let scale = field.color_scale(scale_mode);

    if let Some(dest) = &request.ir_output {
        encode_rgb(&compose(&field, scale), dest)?;
        info!(path = %dest.display(), "wrote infrared image");
    }

    if let Some(dest) = &request.visual_output {
        source.write_visual(dest)?;
        info!(path = %dest.display(), "wrote visual image");
    }

    let audio_output = match source.write_audio() {
        Ok(Some(path)) => {
            info!(path = %path.display(), "wrote audio sidecar");
            Some(path)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "dropping audio sidecar");
            None
        }
    };

    Ok(ConversionReport {
        source: request.source.clone(),
        variant: layout.variant,
        min: field.min,
        max: field.max,
        scale,
        scale_mode,
        ir_output: request.ir_output.clone(),
        visual_output: request.visual_output.clone(),
        audio_output,
    })
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        io::{Cursor, Write},
    };

    use anyhow::Result;
    use image::{Rgb, RgbImage};
    use zip::{write::FileOptions, CompressionMethod, ZipWriter};

    use super::*;
    use crate::{
        container::{IR_ENTRY, VISUAL_ENTRY},
        format::{IR_HEIGHT, IR_WIDTH},
        legacy::{AUDIO_OFFSET, VISUAL_OFFSET},
        palette::IRON_PALETTE,
        render::{CANVAS_HEIGHT, CANVAS_WIDTH},
        visual::{VISUAL_HEIGHT, VISUAL_WIDTH},
    };

    const PADDING: usize = 10;
    // end of the 0xff run
    const SENTINEL: usize = PADDING + 20;

    fn ir_block(value: u16) -> Vec<u8> {
        value.to_le_bytes().repeat(IR_WIDTH * IR_HEIGHT)
    }

    /// Legacy file with a constant IR block and a red visual
    /// block, padded to `len` bytes.
    fn legacy_file(raw: u16, len: usize) -> Vec<u8> {
        let ir_offset = FormatVariant::Legacy.layout().ir_offset as usize;
        let mut bytes = vec![0u8; PADDING];
        bytes.extend_from_slice(&[0xff; 20]);
        bytes.resize(SENTINEL + ir_offset, 0);
        bytes.extend(ir_block(raw));
        bytes.resize(SENTINEL + VISUAL_OFFSET as usize, 0);
        bytes.extend(0xf800u16.to_le_bytes().repeat(VISUAL_WIDTH * VISUAL_HEIGHT));
        bytes.resize(len.max(bytes.len()), 0);
        bytes
    }

    fn container_file(entries: &[(&str, &[u8])]) -> Result<Vec<u8>> {
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        let mut zip = ZipWriter::new(Cursor::new(vec![]));
        for (name, data) in entries {
            zip.start_file(*name, options)?;
            zip.write_all(data)?;
        }
        Ok(zip.finish()?.into_inner())
    }

    fn ir_member(raw: u16) -> Vec<u8> {
        let mut bytes = vec![0u8; 640];
        bytes.extend(ir_block(raw));
        bytes
    }

    #[test]
    fn constant_legacy_frame() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("flat.is2");
        fs::write(&input, legacy_file(2000, 0))?;
        let ir = dir.path().join("ir.png");
        let vis = dir.path().join("vis.png");

        let report = convert(&Conversion::new(&input).ir_output(&ir).visual_output(&vis))?;
        assert_eq!(report.variant, FormatVariant::Legacy);
        assert_eq!(report.min.temperature, report.max.temperature);
        assert_eq!((report.min.x, report.min.y), (0, 0));
        assert_eq!(report.scale_mode, ScaleRange::Auto);
        assert!(report.audio_output.is_none());

        let image: RgbImage = image::load_from_memory(&fs::read(&ir)?)?.to_rgb8();
        assert_eq!(image.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        // degenerate range maps everything to the coldest entry;
        // the markers sit in the top left corner
        let expected = Rgb(IRON_PALETTE[0]);
        for y in 0..IR_HEIGHT as u32 {
            for x in 0..IR_WIDTH as u32 {
                if x > 8 || y > 8 {
                    assert_eq!(image.get_pixel(x, y), &expected, "({}, {})", x, y);
                }
            }
        }

        let visual = image::load_from_memory(&fs::read(&vis)?)?.to_rgb8();
        assert_eq!(visual.dimensions(), (VISUAL_WIDTH as u32, VISUAL_HEIGHT as u32));
        assert!(visual.pixels().all(|p| p == &Rgb([248, 0, 0])));
        Ok(())
    }

    #[test]
    fn manual_scale_is_reported() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("flat.is2");
        fs::write(&input, legacy_file(2000, 0))?;

        let params = CalibrationParams::new(20., 0.95, ScaleRange::from_bounds(20., 70.))?;
        let report = convert(&Conversion::new(&input).params(params))?;
        assert_eq!(report.scale, ColorScale::new(20., 70.));

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["variant"], "legacy");
        assert_eq!(json["scale_mode"]["mode"], "manual");
        assert_eq!(json["scale_mode"]["max"], 70.);
        assert!(json["ir_output"].is_null());
        Ok(())
    }

    #[test]
    fn legacy_audio_sidecar() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("voice.IS2");
        let mut bytes = legacy_file(2000, AUDIO_OFFSET as usize);
        let samples: Vec<u16> = (0..1000).map(|i| (i * 37) as u16).collect();
        for s in samples.iter() {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        fs::write(&input, &bytes)?;

        let report = convert(&Conversion::new(&input))?;
        let wav = dir.path().join("voice.IS2.wav");
        assert_eq!(report.audio_output.as_deref(), Some(wav.as_path()));

        let written = fs::read(&wav)?;
        assert_eq!(written.len() - 44, 2 * samples.len());
        assert_eq!(&written[44..], &bytes[AUDIO_OFFSET as usize..]);
        Ok(())
    }

    #[test]
    fn container_end_to_end() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let scratch = tempfile::tempdir()?;
        let input = dir.path().join("room.is2");
        let photo = b"\xff\xd8not decoded, copied\xff\xd9".to_vec();
        fs::write(
            &input,
            container_file(&[(IR_ENTRY, &ir_member(3000)[..]), (VISUAL_ENTRY, &photo[..])])?,
        )?;
        let ir = dir.path().join("ir.jpg");
        let vis = dir.path().join("vis.jpg");

        let report = convert(
            &Conversion::new(&input)
                .ir_output(&ir)
                .visual_output(&vis)
                .scratch_dir(scratch.path()),
        )?;
        assert_eq!(report.variant, FormatVariant::Container);
        assert!(report.audio_output.is_none());
        assert_eq!(fs::read(&vis)?, photo);
        assert_eq!(&fs::read(&ir)?[0..2], &[0xff, 0xd8]);
        assert_eq!(fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn container_failure_does_not_fall_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let scratch = tempfile::tempdir()?;
        let input = dir.path().join("novis.is2");
        // the stored IR header puts a 0xff run near the start
        // of the archive, which would pass the legacy scan
        let mut member = vec![0xffu8; 640];
        member.extend(ir_block(3000));
        fs::write(&input, container_file(&[(IR_ENTRY, &member[..])])?)?;

        let result = convert(
            &Conversion::new(&input)
                .visual_output(dir.path().join("vis.jpg"))
                .scratch_dir(scratch.path()),
        );
        match result {
            Err(Is2Error::Io { path, .. }) => assert!(path.ends_with(VISUAL_ENTRY)),
            other => panic!("unexpected: {:?}", other.map(|r| r.variant)),
        }
        assert_eq!(fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn unrecognized_input() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("notes.txt");
        fs::write(&input, vec![b'x'; 5000])?;

        match convert(&Conversion::new(&input)) {
            Err(Is2Error::FormatUnrecognized(path)) => assert_eq!(path, input),
            other => panic!("unexpected: {:?}", other.map(|r| r.variant)),
        }
        Ok(())
    }

    #[test]
    fn missing_input_is_io_failure() {
        let result = convert(&Conversion::new("/nonexistent/file.is2"));
        assert!(matches!(result, Err(Is2Error::Io { .. })));
    }
}
