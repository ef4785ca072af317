#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_load";
    fs::create_dir_all(dir).unwrap();

    // Minimal valid movie: one bitmap member with palette and pixel data.
    let mut movie = Vec::new();
    let be32 = |v: u32| v.to_be_bytes();
    let be16 = |v: u16| v.to_be_bytes();

    // Chunk bodies laid out after the directory; offsets precomputed.
    // ids: 0 RIFX, 1 imap, 2 mmap, 3 CASt, 4 BITD, 5 CAS*, 6 KEY*
    let cast = {
        let mut c = Vec::new();
        c.extend_from_slice(&be32(1)); // bitmap member type
        c.extend_from_slice(&be32(0)); // no info block
        c.extend_from_slice(&be32(15));
        // Specific blob: 2x1 rect, 8 bpp, palette 0, registration 0,0.
        for v in [0u16, 0, 1, 2, 8] {
            c.extend_from_slice(&be16(v));
        }
        c.push(0);
        c.extend_from_slice(&[0u8; 4]);
        c
    };
    let bitd = vec![0x01u8, 0x00, 0x01];
    let cas: Vec<u8> = be32(3).to_vec();
    let key = {
        let mut k = Vec::new();
        k.extend_from_slice(&be16(12));
        k.extend_from_slice(&be16(12));
        k.extend_from_slice(&be32(1));
        k.extend_from_slice(&be32(1));
        k.extend_from_slice(&be32(4)); // section: the BITD chunk
        k.extend_from_slice(&be32(3)); // owner: the CASt chunk
        k.extend_from_slice(b"BITD");
        k
    };

    let bodies = [
        (*b"CASt", cast),
        (*b"BITD", bitd),
        (*b"CAS*", cas),
        (*b"KEY*", key),
    ];
    let n = 3 + bodies.len();
    let mmap_len = 24 + n * 20;
    let mut offsets = Vec::new();
    let mut pos = 32 + 8 + mmap_len;
    for (_, body) in &bodies {
        pos += pos % 2;
        offsets.push(pos);
        pos += 8 + body.len();
    }

    movie.extend_from_slice(b"RIFX");
    movie.extend_from_slice(&be32((pos - 8) as u32));
    movie.extend_from_slice(b"MV93");
    movie.extend_from_slice(b"imap");
    movie.extend_from_slice(&be32(12));
    movie.extend_from_slice(&be32(1));
    movie.extend_from_slice(&be32(32));
    movie.extend_from_slice(&be32(0)); // version pad up to mmap
    movie.extend_from_slice(b"mmap");
    movie.extend_from_slice(&be32(mmap_len as u32));
    movie.extend_from_slice(&be16(24));
    movie.extend_from_slice(&be16(20));
    movie.extend_from_slice(&be32(n as u32));
    movie.extend_from_slice(&be32(n as u32));
    movie.extend_from_slice(&[0u8; 12]);
    let mut entry = |tag: &[u8; 4], len: usize, offset: usize, out: &mut Vec<u8>| {
        out.extend_from_slice(tag);
        out.extend_from_slice(&be32(len as u32));
        out.extend_from_slice(&be32(offset as u32));
        out.extend_from_slice(&[0u8; 8]);
    };
    entry(b"RIFX", pos - 8, 0, &mut movie);
    entry(b"imap", 12, 12, &mut movie);
    entry(b"mmap", mmap_len, 32, &mut movie);
    for (i, (tag, body)) in bodies.iter().enumerate() {
        entry(tag, body.len(), offsets[i], &mut movie);
    }
    for (i, (tag, body)) in bodies.iter().enumerate() {
        while movie.len() < offsets[i] {
            movie.push(0);
        }
        movie.extend_from_slice(tag);
        movie.extend_from_slice(&be32(body.len() as u32));
        movie.extend_from_slice(body);
    }
    fs::write(format!("{dir}/minimal_movie.dir"), &movie).unwrap();

    // Byte-swapped container marker with no directory.
    fs::write(format!("{dir}/xfir_header.bin"), b"XFIR\x08\x00\x00\x0039VM").unwrap();

    // Truncated/malformed seeds for edge coverage.
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"RIFX").unwrap();
    fs::write(format!("{dir}/afterburner.bin"), b"RIFX\x00\x00\x00\x08FGDM").unwrap();

    println!("Generated seed corpus in {dir}/");
}
