// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Small algebra over 128-bit registers grouped by color channel.
//!
//! A [`Vec3`] holds eight pixels, one register per channel, each lane being one
//! channel value widened to 16 bits. A [`Vec2`] holds two such lane registers side
//! by side, typically the per pixel results of two [`Vec3`] groups.
//!
//! All operations are value returning and compile to one instruction per register.
//! They must be called from code compiled with `ssse3` enabled.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use core::ptr::read_unaligned as loadu;

/// Shuffle index that clears the destination byte
pub const ZERO: i8 = -128;

/// Byte selector for `pshufb`
pub type Pattern = [i8; 16];

/// One selector per channel, in blue, green, red order
pub type Pattern3 = [Pattern; 3];

/// Selectors that move the channels of four consecutive packed pixels into
/// 16-bit lanes.
///
/// Pixel k of the chunk starts at byte `base + depth * k`. Its channels land in the
/// low byte of lane k (`high == false`) or lane k + 4 (`high == true`), the other
/// lanes stay zero.
///
/// bgra, base 0, low half:
/// chunk: a3r3g3b3 a2r2g2b2 a1r1g1b1 a0r0g0b0
/// b:     -------- -------- --b3--b2 --b1--b0
///
/// bgra, base 0, high half:
/// b:     --b3--b2 --b1--b0 -------- --------
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn unpack_pattern(depth: usize, base: usize, high: bool) -> Pattern3 {
    let mut patterns = [[ZERO; 16]; 3];
    let first_lane = if high { 4 } else { 0 };

    let mut channel = 0;
    while channel < 3 {
        let mut pixel = 0;
        while pixel < 4 {
            patterns[channel][2 * (first_lane + pixel)] = (base + depth * pixel + channel) as i8;
            pixel += 1;
        }

        channel += 1;
    }

    patterns
}

/// Selector that gathers `count` bytes, starting at byte `first` and spaced `step`
/// bytes apart, into consecutive output bytes starting at `offset`.
///
/// High byte of every lane into the upper half (first 1, step 2, count 8, offset 8):
/// x:   y7--y6-- y5--y4-- y3--y2-- y1--y0--
/// res: y7y6y5y4 y3y2y1y0 -------- --------
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn repack_pattern(first: usize, step: usize, count: usize, offset: usize) -> Pattern {
    let mut pattern = [ZERO; 16];

    let mut i = 0;
    while i < count {
        pattern[offset + i] = (first + step * i) as i8;
        i += 1;
    }

    pattern
}

#[inline(always)]
unsafe fn load_pattern(pattern: &Pattern) -> __m128i {
    loadu(pattern.as_ptr().cast::<__m128i>())
}

/// Three channel group, eight 16-bit lanes per channel
#[derive(Copy, Clone)]
pub struct Vec3 {
    pub b: __m128i,
    pub g: __m128i,
    pub r: __m128i,
}

/// Two channel group, eight 16-bit lanes per half
#[derive(Copy, Clone)]
pub struct Vec2 {
    pub lo: __m128i,
    pub hi: __m128i,
}

impl Vec3 {
    /// Broadcast one value per channel to all lanes
    #[inline(always)]
    pub unsafe fn splat(b: i16, g: i16, r: i16) -> Self {
        Self {
            b: _mm_set1_epi16(b),
            g: _mm_set1_epi16(g),
            r: _mm_set1_epi16(r),
        }
    }

    #[inline(always)]
    pub unsafe fn from_patterns(patterns: &Pattern3) -> Self {
        Self {
            b: load_pattern(&patterns[0]),
            g: load_pattern(&patterns[1]),
            r: load_pattern(&patterns[2]),
        }
    }

    /// Deinterleave four packed pixels into the lanes selected by `patterns`
    ///
    /// chunk: b5r4g4b4 r3g3b3r2 g2b2r1g1 b1r0g0b0   (bgr, low half)
    /// b:     -------- -------- --b3--b2 --b1--b0
    /// g:     -------- -------- --g3--g2 --g1--g0
    /// r:     -------- -------- --r3--r2 --r1--r0
    #[inline(always)]
    pub unsafe fn unpack(chunk: __m128i, patterns: &Vec3) -> Self {
        Self {
            b: _mm_shuffle_epi8(chunk, patterns.b),
            g: _mm_shuffle_epi8(chunk, patterns.g),
            r: _mm_shuffle_epi8(chunk, patterns.r),
        }
    }

    /// Combine two groups populating disjoint lanes
    ///
    /// self:  -------- -------- --x3--x2 --x1--x0
    /// other: --x7--x6 --x5--x4 -------- --------
    /// res:   --x7--x6 --x5--x4 --x3--x2 --x1--x0
    #[inline(always)]
    pub unsafe fn merge(self, other: Self) -> Self {
        Self {
            b: _mm_or_si128(self.b, other.b),
            g: _mm_or_si128(self.g, other.g),
            r: _mm_or_si128(self.r, other.r),
        }
    }

    /// Per lane product, low 16 bits
    #[inline(always)]
    pub unsafe fn mullo(self, weights: &Vec3) -> Self {
        Self {
            b: _mm_mullo_epi16(self.b, weights.b),
            g: _mm_mullo_epi16(self.g, weights.g),
            r: _mm_mullo_epi16(self.r, weights.r),
        }
    }

    /// Per lane sum of the three channels, wrapping
    #[inline(always)]
    pub unsafe fn sum(self) -> __m128i {
        _mm_add_epi16(_mm_add_epi16(self.b, self.g), self.r)
    }

    #[inline(always)]
    pub unsafe fn sum_pair(lo: Self, hi: Self) -> Vec2 {
        Vec2 {
            lo: lo.sum(),
            hi: hi.sum(),
        }
    }
}

impl Vec2 {
    #[inline(always)]
    pub unsafe fn from_patterns(lo: &Pattern, hi: &Pattern) -> Self {
        Self {
            lo: load_pattern(lo),
            hi: load_pattern(hi),
        }
    }

    /// Per lane add, wrapping
    #[inline(always)]
    pub unsafe fn add(self, bias: __m128i) -> Self {
        Self {
            lo: _mm_add_epi16(self.lo, bias),
            hi: _mm_add_epi16(self.hi, bias),
        }
    }

    /// Per lane arithmetic shift right
    #[inline(always)]
    pub unsafe fn shift_right<const BITS: i32>(self) -> Self {
        Self {
            lo: _mm_srai_epi16::<BITS>(self.lo),
            hi: _mm_srai_epi16::<BITS>(self.hi),
        }
    }

    /// Move bytes of each half to their final position
    #[inline(always)]
    pub unsafe fn repack(self, patterns: &Vec2) -> Self {
        Self {
            lo: _mm_shuffle_epi8(self.lo, patterns.lo),
            hi: _mm_shuffle_epi8(self.hi, patterns.hi),
        }
    }

    /// Merge two repacked halves into one register
    #[inline(always)]
    pub unsafe fn combine(self) -> __m128i {
        _mm_or_si128(self.lo, self.hi)
    }
}
