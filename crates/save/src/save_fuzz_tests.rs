// ---------------------------------------------------------------------------
// save_fuzz_tests – decoder robustness against malformed files
// ---------------------------------------------------------------------------
//
// Random bytes, truncations and bit flips must all produce errors, never
// panics.

use crate::file_header::{unwrap_header, wrap_with_header, HEADER_SIZE, MAGIC};
use crate::save_codec::{decode_save, encode_save, SaveData, CURRENT_SAVE_VERSION};

/// Deterministic xorshift64 generator.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn fill_bytes(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = (self.next_u64() & 0xFF) as u8;
        }
    }

    fn gen_range(&mut self, lo: usize, hi: usize) -> usize {
        if lo >= hi {
            return lo;
        }
        (self.next_u64() as usize) % (hi - lo) + lo
    }
}

fn valid_save_file() -> Vec<u8> {
    let mut save = SaveData {
        version: CURRENT_SAVE_VERSION,
        extensions: Default::default(),
    };
    save.extensions
        .insert("work_schedules".to_string(), (0..200u8).collect());
    save.extensions
        .insert("game_clock".to_string(), vec![1, 2, 3, 4]);
    encode_save(&save).expect("encoding a small save cannot fail")
}

#[test]
fn test_fuzz_random_bytes() {
    let sizes = [0, 1, 2, 3, 4, 10, 27, 28, 29, 50, 100, 1000, 10_000];
    let mut rng = Rng(0xDEAD_BEEF_CAFE_1234);

    for &size in &sizes {
        let mut buf = vec![0u8; size];
        rng.fill_bytes(&mut buf);
        assert!(decode_save(&buf).is_err(), "{size} random bytes decoded");
    }
}

#[test]
fn test_fuzz_random_bytes_with_magic_prefix() {
    let mut rng = Rng(0xFEED_FACE_DEAD_BEEF);
    for _ in 0..50 {
        let size = rng.gen_range(4, 300);
        let mut buf = vec![0u8; size];
        rng.fill_bytes(&mut buf);
        buf[..4].copy_from_slice(&MAGIC);
        assert!(decode_save(&buf).is_err());
    }
}

#[test]
fn test_fuzz_truncated_files() {
    let file = valid_save_file();
    for len in 0..file.len() {
        assert!(
            decode_save(&file[..len]).is_err(),
            "file truncated to {len} bytes decoded"
        );
    }
}

#[test]
fn test_fuzz_single_bit_flips_in_payload() {
    let file = valid_save_file();
    let mut rng = Rng(0x1234_5678_9ABC_DEF0);
    for _ in 0..100 {
        let mut corrupted = file.clone();
        let at = rng.gen_range(HEADER_SIZE, corrupted.len());
        corrupted[at] ^= 1 << rng.gen_range(0, 8);
        assert!(decode_save(&corrupted).is_err(), "flip at byte {at} decoded");
    }
}

#[test]
fn test_fuzz_valid_header_around_garbage() {
    let mut rng = Rng(0xBAAD_F00D_1234_5678);
    for _ in 0..50 {
        let size = rng.gen_range(0, 400);
        let mut payload = vec![0u8; size];
        rng.fill_bytes(&mut payload);
        // Checksum passes, so the decompressor and decoder see the garbage.
        let file = wrap_with_header(&payload, 0, size as u32);
        assert!(unwrap_header(&file).is_ok());
        let _ = decode_save(&file);
    }
}
