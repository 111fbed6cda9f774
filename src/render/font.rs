use image::Rgba;
use imageproc::drawing::{draw_text_mut, Canvas};
use lazy_static::lazy_static;
use rusttype::{Font, Scale};

const DEJA_VU_SANS: &[u8] = include_bytes!("DejaVuSans.ttf");
const DEJA_VU_SANS_BOLD: &[u8] = include_bytes!("DejaVuSans-Bold.ttf");

lazy_static! {
    static ref REGULAR: Font<'static> =
        Font::try_from_bytes(DEJA_VU_SANS).expect("embedded font is valid");
    static ref BOLD: Font<'static> =
        Font::try_from_bytes(DEJA_VU_SANS_BOLD).expect("embedded font is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// A font face at a given em size, in pixels.
#[derive(Clone, Copy)]
pub struct Face {
    font: &'static Font<'static>,
    scale: Scale,
}

impl Face {
    pub fn new(weight: Weight, em_size: f32) -> Self {
        let font: &'static Font<'static> = match weight {
            Weight::Regular => &REGULAR,
            Weight::Bold => &BOLD,
        };

        // rusttype scales by ascent - descent, not by em
        let v = font.v_metrics_unscaled();
        let height = em_size * (v.ascent - v.descent) / font.units_per_em() as f32;
        Face {
            font,
            scale: Scale::uniform(height),
        }
    }

    pub fn ascent(&self) -> f32 {
        self.font.v_metrics(self.scale).ascent
    }

    /// Draw `text` with its baseline starting at `(x, y)`.
    /// Glyphs falling outside the canvas are clipped.
    pub fn draw<C>(&self, canvas: &mut C, color: Rgba<u8>, x: i32, y: i32, text: &str)
    where
        C: Canvas<Pixel = Rgba<u8>>,
    {
        let top = y - self.ascent().round() as i32;
        draw_text_mut(canvas, color, x, top, self.scale, self.font, text);
    }
}
