#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Expansion never fails and always fills the requested length.
    let expected = data.first().copied().unwrap_or(0) as usize * 64;
    let out = shockbits::bitmap::rle::decompress(data, expected);
    assert_eq!(out.len(), expected);
});
