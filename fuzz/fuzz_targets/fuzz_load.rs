#![no_main]
use libfuzzer_sys::fuzz_target;
use shockbits::{DirectorFile, Limits};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must come back as errors, never panics.
    let Ok(movie) = DirectorFile::load(data.to_vec()) else {
        return;
    };

    // Cap allocations so the fuzzer explores structure, not OOM.
    let limits = Limits {
        max_pixels: Some(1 << 20),
        max_memory_bytes: Some(16 << 20),
        ..Limits::default()
    };
    let _ = movie.decode_members(Some(&limits), &enough::Unstoppable);
});
