/// The size of a word in bytes.
pub const WORD_SIZE: usize = 4;

/// The number of bits in a byte limb.
pub const BYTE_SIZE: usize = 8;

/// The radix of a byte limb.
pub const BYTE_RADIX: u32 = 1 << BYTE_SIZE;

/// Splits a word into its little-endian byte limbs.
#[must_use]
pub const fn word_to_limbs(word: u32) -> [u8; WORD_SIZE] {
    word.to_le_bytes()
}

/// Recombines little-endian byte limbs, `sum(limb[i] * 256^i)`.
#[must_use]
pub fn limbs_to_word(limbs: [u32; WORD_SIZE]) -> u32 {
    limbs.iter().rev().fold(0u32, |acc, &limb| acc.wrapping_mul(BYTE_RADIX).wrapping_add(limb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_to_limbs() {
        assert_eq!(word_to_limbs(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(word_to_limbs(u32::MAX), [0xff; 4]);
    }

    #[test]
    fn test_limbs_reconstruct_word() {
        for word in [0u32, 1, 0xff, 0x100, 0xdead_beef, u32::MAX] {
            let limbs = word_to_limbs(word).map(u32::from);
            assert!(limbs.iter().all(|&l| l < BYTE_RADIX));
            assert_eq!(limbs_to_word(limbs), word);
        }
    }
}
