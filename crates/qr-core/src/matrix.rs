use crate::bitbuffer::get_bit;
use crate::ecc::CodeEcc;
use crate::error::EncodeError;
use crate::finder_penalty::FinderPenalty;
use crate::mask::Mask;
use crate::reed_solomon;
use crate::tables::{
    self, ECC_CODEWORDS_PER_BLOCK, NUM_ERROR_CORRECTION_BLOCKS, PENALTY_N1, PENALTY_N2, PENALTY_N3,
    PENALTY_N4,
};
use crate::version::Version;

/// A QR Code symbol: the module grid produced by the matrix layout engine,
/// mask scorer, and format/version information writer (`spec.md` §4.7-4.9).
///
/// Construct via [`QrCode::encode_codewords`], the low-level entry point that
/// takes already-built, already-padded data codewords (see `crate::encode`
/// for the higher-level entry point that builds those codewords from text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    pub version: Version,

    /// Side length in modules, `21 + 4*(version-1)`, between 21 and 177.
    pub size: i32,

    pub errorcorrectionlevel: CodeEcc,

    /// The mask pattern ultimately applied, 0..=7. Set even when the caller
    /// requested automatic mask selection.
    pub mask: Mask,

    // false = light, true = dark.
    modules: Vec<bool>,

    // Function-module marker grid. Cleared after the constructor finishes.
    isfunction: Vec<bool>,
}

impl QrCode {
    /// Creates a new QR Code with the given version, ECC level, already-built
    /// data codeword bytes (headers, terminator and padding all included,
    /// EC codewords excluded), and an optional forced mask.
    ///
    /// `datacodewords.len()` must equal `tables::num_data_codewords(ver, ecl)`.
    ///
    /// Returns [`EncodeError::InternalInvariantViolated`] if any of the
    /// layout engine's own post-conditions (format-bit width, version-bit
    /// width, codeword-stream length, dark-module ratio bucket) fail to hold
    /// — always a bug in this crate's table data or layout math, never a
    /// caller mistake.
    pub fn encode_codewords(
        ver: Version,
        ecl: CodeEcc,
        datacodewords: &[u8],
        mut msk: Option<Mask>,
    ) -> Result<Self, EncodeError> {
        let size = usize::from(ver.value()) * 4 + 17;
        let mut result = Self {
            version: ver,
            size: size as i32,
            mask: Mask::new(0), // overwritten below
            errorcorrectionlevel: ecl,
            modules: vec![false; size * size],
            isfunction: vec![false; size * size],
        };

        result.draw_function_patterns()?;
        let allcodewords = result.add_ecc_and_interleave(datacodewords);
        result.draw_codewords(&allcodewords)?;

        if msk.is_none() {
            let mut minpenalty = i32::MAX;
            for i in 0u8..8 {
                let i = Mask::new(i);
                result.apply_mask(i);
                result.draw_format_bits(i)?;
                let penalty = result.get_penalty_score()?;
                tracing::trace!(mask = i.value(), penalty, "scored mask candidate");
                if penalty < minpenalty {
                    msk = Some(i);
                    minpenalty = penalty;
                }
                result.apply_mask(i); // undo, since apply_mask is its own inverse
            }
        }
        let msk = msk.unwrap();
        tracing::debug!(version = ver.value(), mask = msk.value(), "selected mask");
        result.mask = msk;
        result.apply_mask(msk);
        result.draw_format_bits(msk)?;

        result.isfunction.clear();
        result.isfunction.shrink_to_fit();
        Ok(result)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn error_correction_level(&self) -> CodeEcc {
        self.errorcorrectionlevel
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at (x, y): `false` for light, `true`
    /// for dark. Out-of-bounds coordinates return `false`.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x) && (0..self.size).contains(&y) && self.module(x, y)
    }

    fn module(&self, x: i32, y: i32) -> bool {
        self.modules[(y * self.size + x) as usize]
    }

    fn module_mut(&mut self, x: i32, y: i32) -> &mut bool {
        &mut self.modules[(y * self.size + x) as usize]
    }

    /*---- Function patterns (spec.md §4.7, steps 1-6) ----*/

    fn draw_function_patterns(&mut self) -> Result<(), EncodeError> {
        let size = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        let alignpatpos = tables::alignment_pattern_positions(self.version, self.size);
        let numalign = alignpatpos.len();
        for i in 0..numalign {
            for j in 0..numalign {
                // Skip the three finder corners.
                if !(i == 0 && j == 0 || i == 0 && j == numalign - 1 || i == numalign - 1 && j == 0)
                {
                    self.draw_alignment_pattern(alignpatpos[i], alignpatpos[j]);
                }
            }
        }

        self.draw_format_bits(Mask::new(0))?; // dummy value, overwritten once the mask is chosen
        self.draw_version()?;
        Ok(())
    }

    fn draw_format_bits(&mut self, mask: Mask) -> Result<(), EncodeError> {
        let bits: u32 = {
            let data = u32::from(self.errorcorrectionlevel.format_bits() << 3 | mask.value());
            let mut rem = data;
            for _ in 0..10 {
                rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            }
            (data << 10 | rem) ^ 0x5412
        };
        if bits >> 15 != 0 {
            return Err(EncodeError::InternalInvariantViolated(format!(
                "format information {bits:#x} does not fit in 15 bits"
            )));
        }

        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        let size = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true); // the dark module (spec.md §3)
        Ok(())
    }

    fn draw_version(&mut self) -> Result<(), EncodeError> {
        if self.version.value() < 7 {
            return Ok(());
        }
        let bits: u32 = {
            let data = u32::from(self.version.value());
            let mut rem = data;
            for _ in 0..12 {
                rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
            }
            data << 12 | rem
        };
        if bits >> 18 != 0 {
            return Err(EncodeError::InternalInvariantViolated(format!(
                "version information {bits:#x} does not fit in 18 bits"
            )));
        }

        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
        Ok(())
    }

    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx = x + dx;
                let yy = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist = std::cmp::max(dx.abs(), dy.abs());
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, std::cmp::max(dx.abs(), dy.abs()) != 1);
            }
        }
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        *self.module_mut(x, y) = isdark;
        self.isfunction[(y * self.size + x) as usize] = true;
    }

    /*---- Codewords and masking (spec.md §4.6, §4.7 data-streaming, §4.8) ----*/

    // Splits data into blocks, computes EC per block (spec.md §4.5), and
    // interleaves data then EC columns (spec.md §4.6).
    fn add_ecc_and_interleave(&self, data: &[u8]) -> Vec<u8> {
        let ver = self.version;
        let ecl = self.errorcorrectionlevel;
        assert_eq!(
            data.len(),
            tables::num_data_codewords(ver, ecl),
            "data length must match the codeword capacity for (version, ecc)"
        );

        let numblocks = tables::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let blockecclen = tables::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords = tables::num_raw_data_modules(ver) / 8;
        let numshortblocks = numblocks - rawcodewords % numblocks;
        let shortblocklen = rawcodewords / numblocks;

        let mut blocks = Vec::<Vec<u8>>::with_capacity(numblocks);
        let rsdiv = reed_solomon::generator_polynomial(blockecclen as u8);
        let mut k = 0usize;
        for i in 0..numblocks {
            let datlen = shortblocklen - blockecclen + usize::from(i >= numshortblocks);
            let mut dat = data[k..k + datlen].to_vec();
            k += datlen;
            let ecc = reed_solomon::compute_remainder(&dat, &rsdiv);
            if i < numshortblocks {
                dat.push(0);
            }
            dat.extend_from_slice(&ecc);
            blocks.push(dat);
        }

        let mut result = Vec::<u8>::with_capacity(rawcodewords);
        for i in 0..=shortblocklen {
            for (j, block) in blocks.iter().enumerate() {
                if i != shortblocklen - blockecclen || j >= numshortblocks {
                    result.push(block[i]);
                }
            }
        }
        result
    }

    // Streams interleaved codewords into the data area in the standard
    // zig-zag column-pair order (spec.md §4.7 "Data streaming order").
    fn draw_codewords(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        assert_eq!(
            data.len(),
            tables::num_raw_data_modules(self.version) / 8,
            "interleaved codeword count must match the raw data module capacity"
        );

        let mut i: usize = 0;
        let mut right = self.size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5; // never stream through the vertical timing column
            }
            for vert in 0..self.size {
                for j in 0..2 {
                    let x = right - j;
                    let upward = (right + 1) & 2 == 0;
                    let y = if upward { self.size - 1 - vert } else { vert };
                    if !self.isfunction[(y * self.size + x) as usize] && i < data.len() * 8 {
                        *self.module_mut(x, y) = get_bit(u32::from(data[i >> 3]), 7 - ((i as i32) & 7));
                        i += 1;
                    }
                    // Remainder bits (0-7) were initialized to light and are left unchanged here.
                }
            }
            right -= 2;
        }
        if i != data.len() * 8 {
            return Err(EncodeError::InternalInvariantViolated(format!(
                "zig-zag placement streamed {i} bits, expected {}",
                data.len() * 8
            )));
        }
        Ok(())
    }

    // XORs the codeword modules with the chosen mask pattern (spec.md §4.8).
    // Calling this twice with the same mask undoes it, since XOR is its own inverse.
    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let invert = match mask.value() {
                    0 => (x + y) % 2 == 0,
                    1 => y % 2 == 0,
                    2 => x % 3 == 0,
                    3 => (x + y) % 3 == 0,
                    4 => (x / 3 + y / 2) % 2 == 0,
                    5 => x * y % 2 + x * y % 3 == 0,
                    6 => (x * y % 2 + x * y % 3) % 2 == 0,
                    7 => ((x + y) % 2 + x * y % 3) % 2 == 0,
                    _ => unreachable!(),
                };
                *self.module_mut(x, y) ^= invert & !self.isfunction[(y * self.size + x) as usize];
            }
        }
    }

    // The four-term penalty score used to pick the best mask (spec.md §4.8).
    fn get_penalty_score(&self) -> Result<i32, EncodeError> {
        let mut result = 0i32;
        let size = self.size;

        for y in 0..size {
            let mut runcolor = false;
            let mut runx = 0i32;
            let mut runhistory = FinderPenalty::new(size);
            for x in 0..size {
                if self.module(x, y) == runcolor {
                    runx += 1;
                    if runx == 5 {
                        result += PENALTY_N1;
                    } else if runx > 5 {
                        result += 1;
                    }
                } else {
                    runhistory.add_history(runx);
                    if !runcolor {
                        result += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = self.module(x, y);
                    runx = 1;
                }
            }
            result += runhistory.terminate_and_count(runcolor, runx) * PENALTY_N3;
        }
        for x in 0..size {
            let mut runcolor = false;
            let mut runy = 0i32;
            let mut runhistory = FinderPenalty::new(size);
            for y in 0..size {
                if self.module(x, y) == runcolor {
                    runy += 1;
                    if runy == 5 {
                        result += PENALTY_N1;
                    } else if runy > 5 {
                        result += 1;
                    }
                } else {
                    runhistory.add_history(runy);
                    if !runcolor {
                        result += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = self.module(x, y);
                    runy = 1;
                }
            }
            result += runhistory.terminate_and_count(runcolor, runy) * PENALTY_N3;
        }

        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.module(x, y);
                if color == self.module(x + 1, y)
                    && color == self.module(x, y + 1)
                    && color == self.module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        let dark: i32 = self.modules.iter().copied().map(i32::from).sum();
        let total = size * size;
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        if !(0..=9).contains(&k) {
            return Err(EncodeError::InternalInvariantViolated(format!(
                "dark-module ratio bucket {k} out of the expected 0..=9 range"
            )));
        }
        result += k * PENALTY_N4;
        Ok(result)
    }
}
