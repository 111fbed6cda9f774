//! The fixed "iron" false-color palette and the mapping of
//! temperatures onto it.
//!
//! The table is the camera vendor's hot-iron ramp, stored
//! verbatim. Rendered images are only comparable with the
//! vendor software when these exact values are used, so the
//! ramp is never interpolated or regenerated.
use serde_derive::*;

/// Number of entries in [`IRON_PALETTE`].
pub const PALETTE_SIZE: usize = 433;

/// Largest valid palette index.
pub const MAX_INDEX: usize = PALETTE_SIZE - 1;

const fn hex(c: u32) -> [u8; 3] {
    [(c >> 16) as u8, (c >> 8) as u8, c as u8]
}

/// Iron palette, coldest (index 0) to hottest.
pub static IRON_PALETTE: [[u8; 3]; PALETTE_SIZE] = [
    hex(0x00000a), hex(0x000014), hex(0x00001e), hex(0x000025), hex(0x00002a), hex(0x00002e),
    hex(0x000032), hex(0x000036), hex(0x00003a), hex(0x00003e), hex(0x000042), hex(0x000046),
    hex(0x00004a), hex(0x00004f), hex(0x000052), hex(0x010055), hex(0x010057), hex(0x020059),
    hex(0x02005c), hex(0x03005e), hex(0x040061), hex(0x040063), hex(0x050065), hex(0x060067),
    hex(0x070069), hex(0x08006b), hex(0x09006e), hex(0x0a0070), hex(0x0b0073), hex(0x0c0074),
    hex(0x0d0075), hex(0x0d0076), hex(0x0e0077), hex(0x100078), hex(0x120079), hex(0x13007b),
    hex(0x15007c), hex(0x17007d), hex(0x19007e), hex(0x1b0080), hex(0x1c0081), hex(0x1e0083),
    hex(0x200084), hex(0x220085), hex(0x240086), hex(0x260087), hex(0x280089), hex(0x2a0089),
    hex(0x2c008a), hex(0x2e008b), hex(0x30008c), hex(0x32008d), hex(0x34008e), hex(0x36008e),
    hex(0x38008f), hex(0x390090), hex(0x3b0091), hex(0x3c0092), hex(0x3e0093), hex(0x3f0093),
    hex(0x410094), hex(0x420095), hex(0x440095), hex(0x450096), hex(0x470096), hex(0x490096),
    hex(0x4a0096), hex(0x4c0097), hex(0x4e0097), hex(0x4f0097), hex(0x510097), hex(0x520098),
    hex(0x540098), hex(0x560098), hex(0x580099), hex(0x5a0099), hex(0x5c0099), hex(0x5d009a),
    hex(0x5f009a), hex(0x61009b), hex(0x63009b), hex(0x64009b), hex(0x66009b), hex(0x68009b),
    hex(0x6a009b), hex(0x6c009c), hex(0x6d009c), hex(0x6f009c), hex(0x70009c), hex(0x71009d),
    hex(0x73009d), hex(0x75009d), hex(0x77009d), hex(0x78009d), hex(0x7a009d), hex(0x7c009d),
    hex(0x7e009d), hex(0x7f009d), hex(0x81009d), hex(0x83009d), hex(0x84009d), hex(0x86009d),
    hex(0x87009d), hex(0x89009d), hex(0x8a009d), hex(0x8b009d), hex(0x8d009d), hex(0x8f009c),
    hex(0x91009c), hex(0x93009c), hex(0x95009c), hex(0x96009b), hex(0x98009b), hex(0x99009b),
    hex(0x9b009b), hex(0x9c009b), hex(0x9d009b), hex(0x9f009b), hex(0xa0009b), hex(0xa2009b),
    hex(0xa3009b), hex(0xa4009b), hex(0xa6009a), hex(0xa7009a), hex(0xa8009a), hex(0xa90099),
    hex(0xaa0099), hex(0xab0099), hex(0xad0099), hex(0xae0198), hex(0xaf0198), hex(0xb00198),
    hex(0xb00198), hex(0xb10197), hex(0xb20197), hex(0xb30196), hex(0xb40296), hex(0xb50295),
    hex(0xb60295), hex(0xb70395), hex(0xb80395), hex(0xb90495), hex(0xba0495), hex(0xba0494),
    hex(0xbb0593), hex(0xbc0593), hex(0xbd0593), hex(0xbe0692), hex(0xbf0692), hex(0xbf0692),
    hex(0xc00791), hex(0xc00791), hex(0xc10890), hex(0xc10990), hex(0xc20a8f), hex(0xc30a8e),
    hex(0xc30b8e), hex(0xc40c8d), hex(0xc50c8c), hex(0xc60d8b), hex(0xc60e8a), hex(0xc70f89),
    hex(0xc81088), hex(0xc91187), hex(0xca1286), hex(0xca1385), hex(0xcb1385), hex(0xcb1484),
    hex(0xcc1582), hex(0xcd1681), hex(0xce1780), hex(0xce187e), hex(0xcf187c), hex(0xcf197b),
    hex(0xd01a79), hex(0xd11b78), hex(0xd11c76), hex(0xd21c75), hex(0xd21d74), hex(0xd31e72),
    hex(0xd32071), hex(0xd4216f), hex(0xd4226e), hex(0xd5236b), hex(0xd52469), hex(0xd62567),
    hex(0xd72665), hex(0xd82764), hex(0xd82862), hex(0xd92a60), hex(0xda2b5e), hex(0xda2c5c),
    hex(0xdb2e5a), hex(0xdb2f57), hex(0xdc2f54), hex(0xdd3051), hex(0xdd314e), hex(0xde324a),
    hex(0xde3347), hex(0xdf3444), hex(0xdf3541), hex(0xdf363d), hex(0xe0373a), hex(0xe03837),
    hex(0xe03933), hex(0xe13a30), hex(0xe23b2d), hex(0xe23c2a), hex(0xe33d26), hex(0xe33e23),
    hex(0xe43f20), hex(0xe4411d), hex(0xe4421c), hex(0xe5431b), hex(0xe54419), hex(0xe54518),
    hex(0xe64616), hex(0xe74715), hex(0xe74814), hex(0xe74913), hex(0xe84a12), hex(0xe84c10),
    hex(0xe84c0f), hex(0xe94d0e), hex(0xe94d0d), hex(0xea4e0c), hex(0xea4f0c), hex(0xeb500b),
    hex(0xeb510a), hex(0xeb520a), hex(0xeb5309), hex(0xec5409), hex(0xec5608), hex(0xec5708),
    hex(0xec5808), hex(0xed5907), hex(0xed5a07), hex(0xed5b06), hex(0xee5c06), hex(0xee5c05),
    hex(0xee5d05), hex(0xee5e05), hex(0xef5f04), hex(0xef6004), hex(0xef6104), hex(0xef6204),
    hex(0xf06303), hex(0xf06403), hex(0xf06503), hex(0xf16603), hex(0xf16603), hex(0xf16703),
    hex(0xf16803), hex(0xf16902), hex(0xf16a02), hex(0xf16b02), hex(0xf16b02), hex(0xf26c01),
    hex(0xf26d01), hex(0xf26e01), hex(0xf36f01), hex(0xf37001), hex(0xf37101), hex(0xf37201),
    hex(0xf47300), hex(0xf47400), hex(0xf47500), hex(0xf47600), hex(0xf47700), hex(0xf47800),
    hex(0xf47a00), hex(0xf57b00), hex(0xf57c00), hex(0xf57e00), hex(0xf57f00), hex(0xf68000),
    hex(0xf68100), hex(0xf68200), hex(0xf78300), hex(0xf78400), hex(0xf78500), hex(0xf78600),
    hex(0xf88700), hex(0xf88800), hex(0xf88800), hex(0xf88900), hex(0xf88a00), hex(0xf88b00),
    hex(0xf88c00), hex(0xf98d00), hex(0xf98d00), hex(0xf98e00), hex(0xf98f00), hex(0xf99000),
    hex(0xf99100), hex(0xf99200), hex(0xf99300), hex(0xfa9400), hex(0xfa9500), hex(0xfa9600),
    hex(0xfb9800), hex(0xfb9900), hex(0xfb9a00), hex(0xfb9c00), hex(0xfc9d00), hex(0xfc9f00),
    hex(0xfca000), hex(0xfca100), hex(0xfda200), hex(0xfda300), hex(0xfda400), hex(0xfda600),
    hex(0xfda700), hex(0xfda800), hex(0xfdaa00), hex(0xfdab00), hex(0xfdac00), hex(0xfdad00),
    hex(0xfdae00), hex(0xfeaf00), hex(0xfeb000), hex(0xfeb100), hex(0xfeb200), hex(0xfeb300),
    hex(0xfeb400), hex(0xfeb500), hex(0xfeb600), hex(0xfeb800), hex(0xfeb900), hex(0xfeb900),
    hex(0xfeba00), hex(0xfebb00), hex(0xfebc00), hex(0xfebd00), hex(0xfebe00), hex(0xfec000),
    hex(0xfec100), hex(0xfec200), hex(0xfec300), hex(0xfec400), hex(0xfec500), hex(0xfec600),
    hex(0xfec700), hex(0xfec800), hex(0xfec901), hex(0xfeca01), hex(0xfeca01), hex(0xfecb01),
    hex(0xfecc02), hex(0xfecd02), hex(0xfece03), hex(0xfecf04), hex(0xfecf04), hex(0xfed005),
    hex(0xfed106), hex(0xfed308), hex(0xfed409), hex(0xfed50a), hex(0xfed60a), hex(0xfed70b),
    hex(0xfed80c), hex(0xfed90d), hex(0xffda0e), hex(0xffda0e), hex(0xffdb10), hex(0xffdc12),
    hex(0xffdc14), hex(0xffdd16), hex(0xffde19), hex(0xffde1b), hex(0xffdf1e), hex(0xffe020),
    hex(0xffe122), hex(0xffe224), hex(0xffe226), hex(0xffe328), hex(0xffe42b), hex(0xffe42e),
    hex(0xffe531), hex(0xffe635), hex(0xffe638), hex(0xffe73c), hex(0xffe83f), hex(0xffe943),
    hex(0xffea46), hex(0xffeb49), hex(0xffeb4d), hex(0xffec50), hex(0xffed54), hex(0xffee57),
    hex(0xffee5b), hex(0xffee5f), hex(0xffef63), hex(0xffef67), hex(0xfff06a), hex(0xfff06e),
    hex(0xfff172), hex(0xfff177), hex(0xfff17b), hex(0xfff280), hex(0xfff285), hex(0xfff28a),
    hex(0xfff38e), hex(0xfff492), hex(0xfff496), hex(0xfff49a), hex(0xfff59e), hex(0xfff5a2),
    hex(0xfff5a6), hex(0xfff6aa), hex(0xfff6af), hex(0xfff7b3), hex(0xfff7b6), hex(0xfff8ba),
    hex(0xfff8bd), hex(0xfff8c1), hex(0xfff8c4), hex(0xfff9c7), hex(0xfff9ca), hex(0xfff9cd),
    hex(0xfffad1), hex(0xfffad4), hex(0xfffbd8), hex(0xfffcdb), hex(0xfffcdf), hex(0xfffde2),
    hex(0xfffde5), hex(0xfffde8), hex(0xfffeeb), hex(0xfffeee), hex(0xfffef1), hex(0xfffef4),
    hex(0xfffff6),
];

/// Temperature range mapped across the whole palette.
///
/// Bounds are not validated: temperatures outside the range
/// (or a degenerate range) are handled by clamping the
/// resulting index.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        ColorScale { min, max }
    }

    /// Palette entries per degree.
    pub fn color_step(&self) -> f64 {
        PALETTE_SIZE as f64 / (self.max - self.min)
    }

    /// Palette index for a temperature.
    ///
    /// Uses the distance from `min`, so values below the
    /// range fold back upwards before clamping.
    pub fn index(&self, temperature: f64) -> usize {
        clamp_index((self.min - temperature).abs() * self.color_step())
    }

    pub fn color(&self, temperature: f64) -> [u8; 3] {
        IRON_PALETTE[self.index(temperature)]
    }
}

/// Palette index for row `y` of a legend strip `rows` tall,
/// hottest at the top.
pub fn legend_index(y: u32, rows: u32) -> usize {
    let step = PALETTE_SIZE as f64 / rows as f64;
    clamp_index(MAX_INDEX as f64 - step * y as f64)
}

fn clamp_index(ci: f64) -> usize {
    if ci.is_nan() || ci <= 0. {
        0
    } else if ci >= MAX_INDEX as f64 {
        MAX_INDEX
    } else {
        ci as usize
    }
}
