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

//! RFB pixel format record and its mapping onto packer shifts.
//!
//! The server advertises a pixel format in `ServerInit`, and the client may
//! replace it with `SetPixelFormat` (RFC 6143 §7.4). Both carry the same
//! 16-byte record. For 32bpp true-colour formats the red, green and blue
//! shifts in that record are exactly the shifts the packer needs.
//!
//! A `SetPixelFormat` message is [`CLIENT_MSG_SET_PIXEL_FORMAT`], three
//! padding bytes, then the record; the session strips the first four bytes
//! and hands the rest to [`PixelFormat::from_bytes`].

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{PackError, Result};
use crate::pack::ChannelShifts;

/// Size of a serialized `PIXEL_FORMAT` record, padding included.
pub const PIXEL_FORMAT_LEN: usize = 16;

/// Message type: client replaces the pixel format updates are sent in.
///
/// Its payload is the record this module parses, and the shifts in it are
/// what the packer is reconfigured with.
pub const CLIENT_MSG_SET_PIXEL_FORMAT: u8 = 0;

/// Wire `PIXEL_FORMAT` record.
///
/// Only 32bpp true-colour formats in host byte order can be fed to the
/// packer; see [`PixelFormat::is_packable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFormat {
    /// Bits per packed pixel (8, 16 or 32 on the wire).
    pub bits_per_pixel: u8,
    /// Significant bits within a pixel.
    pub depth: u8,
    /// Non-zero when multi-byte pixels are sent most significant byte first.
    pub big_endian_flag: u8,
    /// Non-zero for true colour, zero for a colour map.
    pub true_colour_flag: u8,
    /// Largest red value (255 for 8-bit channels).
    pub red_max: u16,
    /// Largest green value.
    pub green_max: u16,
    /// Largest blue value.
    pub blue_max: u16,
    /// Bit position of red in the pixel word.
    pub red_shift: u8,
    /// Bit position of green.
    pub green_shift: u8,
    /// Bit position of blue.
    pub blue_shift: u8,
}

impl PixelFormat {
    /// The server's native format: `0x00RRGGBB` words, 24-bit depth.
    ///
    /// Packing a `BGRA` capture into this format on a little-endian host
    /// leaves the bytes where they are.
    #[must_use]
    pub fn rgb888() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian_flag: 0,
            true_colour_flag: 1,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// Creates a standard 32-bit RGBA pixel format.
    ///
    /// Red in the low byte, as many clients request via `SetPixelFormat`.
    #[must_use]
    pub fn rgba32() -> Self {
        Self {
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
            ..Self::rgb888()
        }
    }

    /// Whether the 32-bit packer can produce pixels in this format.
    ///
    /// Requires 32 bits per pixel, true colour, 8-bit channel maxima, a byte
    /// order flag matching the host, and shifts that fit in the word.
    #[must_use]
    pub fn is_packable(&self) -> bool {
        let host_big_endian = cfg!(target_endian = "big");

        self.bits_per_pixel == 32
            && self.true_colour_flag != 0
            && self.red_max == 255
            && self.green_max == 255
            && self.blue_max == 255
            && (self.big_endian_flag != 0) == host_big_endian
            && self.red_shift < 32
            && self.green_shift < 32
            && self.blue_shift < 32
    }

    /// Derives the packer shifts for this format.
    ///
    /// RFB formats carry no alpha shift. When red, green and blue occupy three
    /// distinct byte lanes, alpha takes the remaining lane; otherwise it sits
    /// at bit 24.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::UnsupportedPixelFormat`] if [`is_packable`](Self::is_packable)
    /// is false.
    pub fn channel_shifts(&self) -> Result<ChannelShifts> {
        if !self.is_packable() {
            log::warn!(
                "Cannot pack into pixel format: bpp={} depth={} true_colour={} big_endian={} max=({},{},{})",
                self.bits_per_pixel,
                self.depth,
                self.true_colour_flag,
                self.big_endian_flag,
                self.red_max,
                self.green_max,
                self.blue_max
            );
            return Err(PackError::UnsupportedPixelFormat(format!(
                "{}bpp depth {} (true colour {}, big endian {})",
                self.bits_per_pixel, self.depth, self.true_colour_flag, self.big_endian_flag
            )));
        }

        let (r, g, b) = (self.red_shift, self.green_shift, self.blue_shift);
        let byte_lanes = [r, g, b].iter().all(|s| s % 8 == 0) && r != g && g != b && r != b;
        // 0 + 8 + 16 + 24 = 48, so the free lane is what the other three leave
        let alpha = if byte_lanes { 48 - (r + g + b) } else { 24 };

        Ok(ChannelShifts::new(r, g, b, alpha))
    }

    /// Appends the 16-byte record to `buf`. Maxima go out in network order.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.reserve(PIXEL_FORMAT_LEN);
        buf.put_slice(&[
            self.bits_per_pixel,
            self.depth,
            self.big_endian_flag,
            self.true_colour_flag,
        ]);
        for max in [self.red_max, self.green_max, self.blue_max] {
            buf.put_u16(max);
        }
        buf.put_slice(&[self.red_shift, self.green_shift, self.blue_shift, 0, 0, 0]);
    }

    /// Takes one record off the front of `buf`.
    ///
    /// # Errors
    ///
    /// [`PackError::Truncated`] when fewer than [`PIXEL_FORMAT_LEN`] bytes are
    /// buffered; `buf` is left as it was.
    pub fn from_bytes(buf: &mut BytesMut) -> Result<Self> {
        if buf.len() < PIXEL_FORMAT_LEN {
            return Err(PackError::Truncated {
                needed: PIXEL_FORMAT_LEN,
                available: buf.len(),
            });
        }

        let mut rec = buf.split_to(PIXEL_FORMAT_LEN);
        let [bits_per_pixel, depth, big_endian_flag, true_colour_flag] =
            [rec.get_u8(), rec.get_u8(), rec.get_u8(), rec.get_u8()];
        let [red_max, green_max, blue_max] = [rec.get_u16(), rec.get_u16(), rec.get_u16()];
        let [red_shift, green_shift, blue_shift] = [rec.get_u8(), rec.get_u8(), rec.get_u8()];
        // remaining three bytes are padding

        Ok(Self {
            bits_per_pixel,
            depth,
            big_endian_flag,
            true_colour_flag,
            red_max,
            green_max,
            blue_max,
            red_shift,
            green_shift,
            blue_shift,
        })
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::rgb888()
    }
}
