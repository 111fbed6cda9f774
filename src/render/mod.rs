//! Rendering of the annotated infrared image.
//!
//! The output canvas is 390x240. The left 320 columns hold
//! the false colour frame; to the right sit a palette strip
//! with a labelled scale. The coldest and hottest pixels are
//! marked with a crosshair and their temperature.
mod font;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    ColorType, DynamicImage, ImageEncoder, RgbImage, Rgba, RgbaImage,
};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, Blend, Canvas},
    rect::Rect,
};
use itertools::iproduct;

use crate::{
    error::{io_error, Is2Error, Result},
    format::{IR_HEIGHT, IR_WIDTH},
    frame::{Extreme, TemperatureField},
    palette::{legend_index, ColorScale, IRON_PALETTE},
};

use self::font::{Face, Weight};

pub const CANVAS_WIDTH: u32 = 390;
pub const CANVAS_HEIGHT: u32 = 240;

pub const JPEG_QUALITY: u8 = 100;

const LEGEND_X: u32 = IR_WIDTH as u32;
const LEGEND_WIDTH: u32 = 16;
const LEGEND_ROWS: u32 = 221;
const AXIS_X: f32 = 344.;
const LABEL_X: i32 = 353;
const SCALE_TOP: f32 = 8.;
const SCALE_BOTTOM: f32 = 213.;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const COLD_MARK: Rgba<u8> = Rgba([200, 200, 255, 230]);
const HOT_MARK: Rgba<u8> = Rgba([255, 200, 200, 230]);

/// Compose the annotated infrared image for `field`, coloured
/// against `scale`.
pub fn compose(field: &TemperatureField, scale: ColorScale) -> RgbImage {
    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, WHITE);

    let (wid, ht) = field.dimensions();
    for (row, col) in iproduct!(0..ht.min(IR_HEIGHT), 0..wid.min(IR_WIDTH)) {
        let [r, g, b] = scale.color(field.temperatures[(row, col)]);
        canvas.put_pixel(col as u32, row as u32, Rgba([r, g, b, 255]));
    }

    draw_legend(&mut canvas, scale);

    let bold = Face::new(Weight::Bold, 13.);
    draw_marker(&mut canvas, &field.min, 4, 4, &bold, BLACK);
    draw_marker(&mut canvas, &field.max, 4, 4, &bold, BLACK);

    let small = Face::new(Weight::Regular, 12.);
    let mut blend = Blend(canvas);
    draw_marker(&mut blend, &field.min, 3, 1, &small, COLD_MARK);
    draw_marker(&mut blend, &field.max, 2, 1, &small, HOT_MARK);

    DynamicImage::ImageRgba8(blend.0).into_rgb8()
}

fn draw_legend(canvas: &mut RgbaImage, scale: ColorScale) {
    for y in 0..LEGEND_ROWS {
        let [r, g, b] = IRON_PALETTE[legend_index(y, LEGEND_ROWS)];
        let right = (LEGEND_X + LEGEND_WIDTH - 1) as f32;
        draw_line_segment_mut(canvas, (LEGEND_X as f32, y as f32), (right, y as f32), Rgba([r, g, b, 255]));
    }
    draw_hollow_rect_mut(
        canvas,
        Rect::at(LEGEND_X as i32, 0).of_size(LEGEND_WIDTH, LEGEND_ROWS),
        BLACK,
    );

    let face = Face::new(Weight::Regular, 14.);
    let strip_end = (LEGEND_X + LEGEND_WIDTH - 1) as f32;

    draw_line_segment_mut(canvas, (LEGEND_X as f32, SCALE_TOP), (strip_end, SCALE_TOP), BLACK);
    face.draw(canvas, BLACK, LABEL_X, 13, &format!("{:.1}", scale.max));
    draw_line_segment_mut(canvas, (LEGEND_X as f32, SCALE_BOTTOM), (strip_end, SCALE_BOTTOM), BLACK);
    face.draw(canvas, BLACK, LABEL_X, 219, &format!("{:.1}", scale.min));

    draw_line_segment_mut(canvas, (AXIS_X, SCALE_TOP), (AXIS_X, SCALE_BOTTOM), BLACK);
    draw_line_segment_mut(canvas, (AXIS_X, SCALE_TOP), (AXIS_X + 6., SCALE_TOP), BLACK);
    for (y, value) in tick_values(scale) {
        draw_line_segment_mut(canvas, (AXIS_X, y as f32), (AXIS_X + 6., y as f32), BLACK);
        face.draw(canvas, BLACK, LABEL_X, y + 4, &format!("{:.0}", value));
    }
    draw_line_segment_mut(canvas, (AXIS_X, SCALE_BOTTOM), (AXIS_X + 6., SCALE_BOTTOM), BLACK);

    face.draw(canvas, BLACK, 346, 234, "°C");
}

/// Interior ticks of the scale axis: `(y, temperature)`, top
/// to bottom.
pub fn tick_values(scale: ColorScale) -> impl Iterator<Item = (i32, f64)> {
    let step = (scale.max - scale.min) / 9.;
    (24..224).step_by(25).map(move |y| {
        let slot = ((224 - y - 24) as f64) / 25. + 1.;
        (y, step * slot + scale.min)
    })
}

// Crosshair with `arm` pixels each side and strokes `width`
// wide, labelled above and to the left.
fn draw_marker<C>(canvas: &mut C, at: &Extreme, arm: i32, width: u32, face: &Face, color: Rgba<u8>)
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    let (x, y) = (at.x as i32, at.y as i32);
    let span = 2 * arm as u32 + 1;
    let half = (width / 2) as i32;
    draw_filled_rect_mut(canvas, Rect::at(x - arm, y - half).of_size(span, width), color);
    draw_filled_rect_mut(canvas, Rect::at(x - half, y - arm).of_size(width, span), color);
    face.draw(canvas, color, x - 12, y - 6, &format!("{:.1}", at.temperature));
}

/// Encode `image` to `dest`: PNG for a `.png` extension,
/// JPEG at full quality otherwise.
pub fn encode_rgb(image: &RgbImage, dest: &Path) -> Result<()> {
    let file = File::create(dest).map_err(io_error(dest))?;
    let mut writer = BufWriter::new(file);
    let (width, height) = image.dimensions();

    let is_png = dest
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
    let encoded = if is_png {
        PngEncoder::new(&mut writer).write_image(image, width, height, ColorType::Rgb8)
    } else {
        JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode(image, width, height, ColorType::Rgb8)
    };
    encoded.map_err(|source| Is2Error::Encode {
        path: dest.to_path_buf(),
        source,
    })?;

    // errors on the final write only show up here
    writer.flush().map_err(io_error(dest))
}
