// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! In-place packing of captured pixels into the client's 32-bit pixel words.
//!
//! Captured frames arrive as `BGRA` bytes. A VNC client with a true-colour
//! 32bpp pixel format expects each pixel as a single word where every channel
//! sits at the shift it negotiated. This module rewrites the capture buffer
//! into exactly that, without allocating.
//!
//! # Semantics
//!
//! For each 4-byte pixel:
//!
//! ```text
//! word = (a << shift_a) | (r << shift_r) | (g << shift_g) | (b << shift_b)
//! ```
//!
//! Channels are widened to `u32` before shifting and OR-ed together with no
//! masking, so overlapping shifts overlap. A shift of 32 or more moves the
//! channel out of the word entirely. The word is stored in host byte order.
//!
//! # Performance
//!
//! The loop body is straight-line: per-channel shift amounts and keep-masks
//! are computed once per call, so there is no branch per pixel and the
//! optimizer can vectorize it.

use crate::error::{PackError, Result};
use crate::layout::SourceLayout;
use crate::protocol::PixelFormat;
use crate::BYTES_PER_PIXEL;

/// Left shift, in bits, of each channel inside the packed 32-bit word.
///
/// No relationship between the four values is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelShifts {
    /// Shift applied to the red channel.
    pub red: u8,
    /// Shift applied to the green channel.
    pub green: u8,
    /// Shift applied to the blue channel.
    pub blue: u8,
    /// Shift applied to the alpha channel.
    pub alpha: u8,
}

impl ChannelShifts {
    /// `0xAARRGGBB`, the layout of the default server pixel format.
    pub const RGBA32: Self = Self::new(16, 8, 0, 24);

    /// Creates a shift set from red, green, blue and alpha shifts.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }
}

impl Default for ChannelShifts {
    fn default() -> Self {
        Self::RGBA32
    }
}

/// Loop-invariant shift amounts and keep-masks for one call.
#[derive(Clone, Copy)]
struct Lanes {
    shift: [u32; 4],
    keep: [u32; 4],
}

impl Lanes {
    #[inline(always)]
    fn new(shifts: ChannelShifts) -> Self {
        let s = [shifts.red, shifts.green, shifts.blue, shifts.alpha];
        Self {
            shift: s.map(|v| u32::from(v & 31)),
            // all ones when the channel lands inside the word, zero otherwise
            keep: s.map(|v| u32::from(v < 32).wrapping_neg()),
        }
    }

    #[inline(always)]
    fn word(&self, (r, g, b, a): (u8, u8, u8, u8)) -> u32 {
        ((u32::from(r) << self.shift[0]) & self.keep[0])
            | ((u32::from(g) << self.shift[1]) & self.keep[1])
            | ((u32::from(b) << self.shift[2]) & self.keep[2])
            | ((u32::from(a) << self.shift[3]) & self.keep[3])
    }
}

/// Packs a single `BGRA` pixel into its 32-bit word.
///
/// # Examples
///
/// ```
/// use rfbpack::{pack_pixel, ChannelShifts};
///
/// let word = pack_pixel([0x10, 0x20, 0x30, 0x40], ChannelShifts::RGBA32);
/// assert_eq!(word, 0x4030_2010);
/// ```
#[inline]
#[must_use]
pub fn pack_pixel(px: [u8; 4], shifts: ChannelShifts) -> u32 {
    Lanes::new(shifts).word(SourceLayout::BGRA.channels(px))
}

/// Rewrites every whole `BGRA` pixel of `buf` in place.
///
/// Trailing bytes that do not form a whole pixel are left untouched, and an
/// empty slice is a no-op.
#[inline]
pub fn pack_in_place(buf: &mut [u8], shifts: ChannelShifts) {
    const SRC: SourceLayout = SourceLayout::BGRA;

    let lanes = Lanes::new(shifts);
    for px in buf.chunks_exact_mut(BYTES_PER_PIXEL) {
        let word = lanes.word((px[SRC.red], px[SRC.green], px[SRC.blue], px[SRC.alpha]));
        px.copy_from_slice(&word.to_ne_bytes());
    }
}

/// Same as [`pack_in_place`] for a source buffer in another channel order.
///
/// The offsets are only known at run time here, so prefer [`pack_in_place`]
/// for `BGRA` captures.
pub fn pack_with_layout(buf: &mut [u8], layout: SourceLayout, shifts: ChannelShifts) {
    let lanes = Lanes::new(shifts);
    for px in buf.chunks_exact_mut(BYTES_PER_PIXEL) {
        let src = [px[0], px[1], px[2], px[3]];
        let word = lanes.word(layout.channels(src));
        px.copy_from_slice(&word.to_ne_bytes());
    }
}

/// Checks that `len` bytes fit in `capacity` and cover whole pixels.
pub(crate) fn check_len(len: usize, capacity: usize) -> Result<()> {
    if len > capacity {
        return Err(PackError::LengthExceedsBuffer { len, capacity });
    }
    if len % BYTES_PER_PIXEL != 0 {
        return Err(PackError::LengthNotMultipleOfFour { len });
    }
    Ok(())
}

/// Packs the first `len` bytes of `buf`.
///
/// The length is validated once, then the prefix goes through the same loop
/// as [`pack_in_place`].
///
/// # Errors
///
/// Returns [`PackError::LengthExceedsBuffer`] if `len > buf.len()` and
/// [`PackError::LengthNotMultipleOfFour`] if `len % 4 != 0`. The buffer is
/// not modified in either case.
pub fn pack_prefix(buf: &mut [u8], len: usize, shifts: ChannelShifts) -> Result<()> {
    check_len(len, buf.len())?;
    pack_in_place(&mut buf[..len], shifts);
    Ok(())
}

/// Packs `buf`, rejecting slices that are not a whole number of pixels.
///
/// # Errors
///
/// Returns [`PackError::LengthNotMultipleOfFour`] without modifying `buf`.
pub fn try_pack(buf: &mut [u8], shifts: ChannelShifts) -> Result<()> {
    pack_prefix(buf, buf.len(), shifts)
}

/// Packs `buf` as disjoint stripes of `stripe_pixels` pixels on the rayon pool.
///
/// The result is byte-for-byte the same as [`pack_in_place`]. A stripe size
/// of zero is treated as one pixel.
#[cfg(feature = "parallel")]
pub fn pack_striped(buf: &mut [u8], shifts: ChannelShifts, stripe_pixels: usize) {
    use rayon::prelude::*;

    let stripe_bytes = stripe_pixels.max(1).saturating_mul(BYTES_PER_PIXEL);
    buf.par_chunks_mut(stripe_bytes)
        .for_each(|stripe| pack_in_place(stripe, shifts));
}

/// A source layout and shift set, negotiated once and reused per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packer {
    layout: SourceLayout,
    shifts: ChannelShifts,
}

impl Packer {
    /// Creates a packer for `BGRA` captures with the given shifts.
    #[must_use]
    pub fn new(shifts: ChannelShifts) -> Self {
        Self { layout: SourceLayout::BGRA, shifts }
    }

    /// Creates a packer producing the words of a negotiated client pixel format.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::UnsupportedPixelFormat`] if the format is not a
    /// 32bpp true-colour format in host byte order.
    pub fn from_pixel_format(format: &PixelFormat) -> Result<Self> {
        let shifts = format.channel_shifts()?;
        log::debug!(
            "Packer configured: shifts r={} g={} b={} a={}",
            shifts.red,
            shifts.green,
            shifts.blue,
            shifts.alpha
        );
        Ok(Self::new(shifts))
    }

    /// Replaces the source channel order.
    #[must_use]
    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// The shift set in use.
    #[must_use]
    pub fn shifts(&self) -> ChannelShifts {
        self.shifts
    }

    /// The source channel order in use.
    #[must_use]
    pub fn layout(&self) -> SourceLayout {
        self.layout
    }

    /// Packs every whole pixel of `buf` in place.
    pub fn pack(&self, buf: &mut [u8]) {
        #[cfg(feature = "debug-logging")]
        log::trace!("Packing {} bytes ({} pixels)", buf.len(), buf.len() / BYTES_PER_PIXEL);

        if self.layout == SourceLayout::BGRA {
            pack_in_place(buf, self.shifts);
        } else {
            pack_with_layout(buf, self.layout, self.shifts);
        }
    }

    /// Packs `buf`, rejecting slices that are not a whole number of pixels.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::LengthNotMultipleOfFour`] without modifying `buf`.
    pub fn try_pack(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), buf.len())?;
        self.pack(buf);
        Ok(())
    }
}
