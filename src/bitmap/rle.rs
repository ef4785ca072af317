//! Packbits-style run-length expansion.
//!
//! Corrupt and nonstandard producer files are common, so this never
//! fails: output is always exactly the requested length, with truncated
//! input zero-filled and overlong runs clamped at the output bound. The
//! cost is garbage pixels in the damaged region, which beats losing the
//! whole member.

use alloc::vec;
use alloc::vec::Vec;

/// Expand `input` to exactly `expected_size` bytes.
///
/// A non-negative control byte `c` copies the next `c + 1` bytes
/// verbatim; a negative one repeats the following byte `1 - c` times
/// (for an unsigned reading `n` of a high-bit-set control byte, the
/// repeat count is `257 - n`).
pub fn decompress(input: &[u8], expected_size: usize) -> Vec<u8> {
    let mut out = vec![0u8; expected_size];
    let mut pos = 0usize;
    let mut i = 0usize;

    while pos < expected_size && i < input.len() {
        let control = input[i] as i8;
        i += 1;

        if control >= 0 {
            let run = control as usize + 1;
            let take = run.min(input.len() - i);
            let write = take.min(expected_size - pos);
            out[pos..pos + write].copy_from_slice(&input[i..i + write]);
            pos += write;
            i += take;
        } else {
            let run = 1 + (-(control as i32)) as usize;
            let Some(&value) = input.get(i) else {
                break;
            };
            i += 1;
            let write = run.min(expected_size - pos);
            out[pos..pos + write].fill(value);
            pos += write;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_then_repeat_with_zero_fill() {
        // 4 literals, then 0x05 repeated 3 times, then input exhausted.
        let input = [0x03, 0x01, 0x02, 0x03, 0x04, 0xFE, 0x05];
        let out = decompress(&input, 8);
        assert_eq!(out, [0x01, 0x02, 0x03, 0x04, 0x05, 0x05, 0x05, 0x00]);
    }

    #[test]
    fn output_length_is_always_exact() {
        for expected in [0usize, 1, 7, 64, 1000] {
            assert_eq!(decompress(&[], expected).len(), expected);
            assert_eq!(decompress(&[0x00, 0xAA], expected).len(), expected);
            assert_eq!(decompress(&[0x81, 0xAA, 0x7F], expected).len(), expected);
            let long: Vec<u8> = (0..4096).map(|i| i as u8).collect();
            assert_eq!(decompress(&long, expected).len(), expected);
        }
    }

    #[test]
    fn overshooting_repeat_run_is_clamped() {
        // 0x80 as control: repeat count 257 - 128 = 129.
        let out = decompress(&[0x80, 0x7E], 4);
        assert_eq!(out, [0x7E; 4]);
    }

    #[test]
    fn overshooting_literal_run_is_clamped() {
        let input = [0x05, 1, 2, 3, 4, 5, 6];
        let out = decompress(&input, 3);
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn truncated_literal_run_zero_fills() {
        // Control promises 4 literals, input carries 2.
        let out = decompress(&[0x03, 0xAA, 0xBB], 6);
        assert_eq!(out, [0xAA, 0xBB, 0, 0, 0, 0]);
    }

    #[test]
    fn dangling_repeat_control_zero_fills() {
        let out = decompress(&[0xFE], 3);
        assert_eq!(out, [0, 0, 0]);
    }

    #[test]
    fn empty_input_zero_fills() {
        assert_eq!(decompress(&[], 4), [0, 0, 0, 0]);
    }

    #[test]
    fn back_to_back_runs() {
        // Two repeat runs then a literal run, exactly filling the output.
        let input = [0xFF, 0x11, 0xFF, 0x22, 0x01, 0x33, 0x44];
        let out = decompress(&input, 6);
        assert_eq!(out, [0x11, 0x11, 0x22, 0x22, 0x33, 0x44]);
    }
}
