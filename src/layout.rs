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

//! Byte order of channels within a captured source pixel.

/// Byte offset of each channel inside a 4-byte source pixel.
///
/// Screen capture hands us `BGRA`; the other orders exist so a different
/// capture backend only has to pick a different constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLayout {
    /// Offset of the red byte.
    pub red: usize,
    /// Offset of the green byte.
    pub green: usize,
    /// Offset of the blue byte.
    pub blue: usize,
    /// Offset of the alpha byte.
    pub alpha: usize,
}

impl SourceLayout {
    /// Blue, green, red, alpha. The capture buffer order.
    pub const BGRA: Self = Self { blue: 0, green: 1, red: 2, alpha: 3 };

    /// Red, green, blue, alpha.
    pub const RGBA: Self = Self { red: 0, green: 1, blue: 2, alpha: 3 };

    /// Alpha, red, green, blue.
    pub const ARGB: Self = Self { alpha: 0, red: 1, green: 2, blue: 3 };

    /// Splits a source pixel into `(r, g, b, a)`.
    ///
    /// Offsets are taken modulo 4.
    #[inline(always)]
    #[must_use]
    pub fn channels(&self, px: [u8; 4]) -> (u8, u8, u8, u8) {
        (px[self.red & 3], px[self.green & 3], px[self.blue & 3], px[self.alpha & 3])
    }
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self::BGRA
    }
}
