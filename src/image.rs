//! The decoded raster and the frame metadata that describes it, plus
//! the block-to-raster assembly stage (dequantize -> IDCT -> level
//! shift -> color transform -> place into the padded raster -> trim).
use scoped_threadpool::Pool;

use crate::color_convert::ycbcr_to_rgb;
use crate::idct::{idct_2d, level_shift};
use crate::misc::ColorSpace;
use crate::ppm;

/// Frame-level metadata carried alongside the decoded pixels.
#[derive(Debug, Clone, Default)]
pub struct ImageInfo {
    pub width: u16,
    pub height: u16,
    /// 0 = aspect ratio, 1 = dots per inch, 2 = dots per centimeter.
    pub density_units: u8,
    pub x_density: u16,
    pub y_density: u16,
}

/// A fully decoded image: pixels plus the metadata that produced them.
#[derive(Debug, Clone)]
pub struct Image {
    pub info: ImageInfo,
    pub colorspace: ColorSpace,
    /// Row-major, tightly packed `width * height * num_components` bytes.
    pub pixels: Vec<u8>,
    /// Verbatim text of the JFIF COM segment, if one was present.
    pub comment: Option<String>,
}

impl Image {
    #[must_use]
    pub fn width(&self) -> u16 {
        self.info.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.info.height
    }

    /// Write this image out as a binary PPM (P6) file.
    pub fn dump_ppm(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        ppm::write_ppm(
            path,
            self.info.width,
            self.info.height,
            &self.pixels,
            self.comment.as_deref(),
        )
    }
}

/// One minimum-coded-unit's worth of dequantized-but-not-yet-inverse-
/// transformed coefficients, one 64-entry natural-order block per
/// component (always Y, Cb, Cr for 4:4:4).
pub type McuBlocks = [[i32; 64]; 3];

/// Reconstruct the final RGB raster from a sequence of per-MCU
/// coefficient blocks already in zig-zag-undone, dequantized form.
/// `mcus` is in raster-scan MCU order, `mcu_w`/`mcu_h` are the MCU grid
/// dimensions (so `mcus.len() == mcu_w * mcu_h`), and `width`/`height`
/// are the frame's declared (unpadded) dimensions.
///
/// Per-MCU reconstruction (IDCT, level shift, color transform) is
/// independent of every other MCU, so row-bands of MCUs are farmed out
/// to a small scoped thread pool; the call remains synchronous and
/// returns only once every band has been written.
#[must_use]
pub fn assemble_raster(mcus: &[McuBlocks], mcu_w: usize, mcu_h: usize, width: u16, height: u16) -> Vec<u8> {
    let padded_w = mcu_w * 8;
    let padded_h = mcu_h * 8;
    let mut padded = vec![0u8; padded_w * padded_h * 3];

    let thread_count = num_cpus::get().max(1).min(mcu_h.max(1)) as u32;
    if thread_count <= 1 || mcu_h < 2 {
        reconstruct_rows(mcus, 0, mcu_h, mcu_w, padded_w, &mut padded);
    } else {
        let band = mcu_h.div_ceil(thread_count as usize);
        let mut pool = Pool::new(thread_count);
        let chunk_rows = band * padded_w * 3 * 8;
        pool.scoped(|scope| {
            for (band_idx, chunk) in padded.chunks_mut(chunk_rows).enumerate() {
                let row_start = band_idx * band;
                let row_end = (row_start + band).min(mcu_h);
                if row_start >= row_end {
                    continue;
                }
                scope.execute(move || {
                    reconstruct_rows_into(mcus, row_start, row_end, mcu_w, padded_w, chunk);
                });
            }
        });
    }

    trim(&padded, padded_w, width as usize, height as usize)
}

/// Reconstruct MCU rows `[row_start, row_end)` directly into `padded`
/// (the full-size output buffer).
fn reconstruct_rows(mcus: &[McuBlocks], row_start: usize, row_end: usize, mcu_w: usize, padded_w: usize, padded: &mut [u8]) {
    reconstruct_rows_into(mcus, row_start, row_end, mcu_w, padded_w, padded);
}

/// Reconstruct MCU rows `[row_start, row_end)` into `out`, a buffer
/// whose first scanline corresponds to MCU row `row_start`. `out` must
/// hold at least `(row_end - row_start) * 8 * padded_w * 3` bytes.
fn reconstruct_rows_into(mcus: &[McuBlocks], row_start: usize, row_end: usize, mcu_w: usize, padded_w: usize, out: &mut [u8]) {
    for mcu_row in row_start..row_end {
        for mcu_col in 0..mcu_w {
            let mcu = &mcus[mcu_row * mcu_w + mcu_col];
            let y_block = idct_2d(&mcu[0]);
            let cb_block = idct_2d(&mcu[1]);
            let cr_block = idct_2d(&mcu[2]);

            for by in 0..8 {
                let out_row = (mcu_row - row_start) * 8 + by;
                let row_base = out_row * padded_w * 3;
                for bx in 0..8 {
                    let idx = by * 8 + bx;
                    let y = level_shift(y_block[idx]);
                    let cb = level_shift(cb_block[idx]);
                    let cr = level_shift(cr_block[idx]);
                    let (r, g, b) = ycbcr_to_rgb(y, cb, cr);
                    let out_col = mcu_col * 8 + bx;
                    let px = row_base + out_col * 3;
                    out[px] = r;
                    out[px + 1] = g;
                    out[px + 2] = b;
                }
            }
        }
    }
}

/// Trim a `padded_w`-wide raster down to `width x height`, discarding
/// the bottom/right padding rows and columns introduced by rounding up
/// to a multiple of 8.
fn trim(padded: &[u8], padded_w: usize, width: usize, height: usize) -> Vec<u8> {
    if padded_w == width {
        return padded[..width * height * 3].to_vec();
    }
    let mut out = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        let start = row * padded_w * 3;
        out.extend_from_slice(&padded[start..start + width * 3]);
    }
    out
}
