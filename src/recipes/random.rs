//! @acp:module "Random Sources"
//! @acp:summary "Date-seeded Mulberry32 generator and draw helpers over rand::RngCore"
//! @acp:domain brew
//! @acp:layer service
//!
//! Daily picks must be identical across platforms and reimplementations, so
//! the seeded path uses an explicit 32-bit hash and the Mulberry32 generator
//! with wrapping arithmetic throughout. It implements `RngCore`, so the
//! seeded and thread-local generators are interchangeable at call sites.

use rand::rand_core::impls;
use rand::RngCore;

/// Fold a date key into a 32-bit seed: `hash = hash * 31 + unit` over the
/// UTF-16 code units with signed 32-bit wraparound, then the absolute value.
pub fn date_to_seed(date_key: &str) -> u32 {
    let hash = date_key.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs()
}

/// Mulberry32 seeded generator
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn from_date_key(date_key: &str) -> Self {
        Self::new(date_to_seed(date_key))
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

/// One draw in `[0, 1)`: a 32-bit output divided by 2^32.
///
/// `Rng::random::<f64>` uses 53 bits from `next_u64`, which would change
/// every seeded pick, so draws go through this instead.
pub fn next_unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) / 4_294_967_296.0
}

/// Map one draw onto `0..len`. `len` must be non-zero.
pub fn pick_index<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> usize {
    let index = (next_unit(rng) * len as f64).floor() as usize;
    index.min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_to_seed_reference_values() {
        assert_eq!(date_to_seed(""), 0);
        assert_eq!(date_to_seed("a"), 97);
        assert_eq!(date_to_seed("2026-02-10"), 1_161_695_551);
        assert_eq!(date_to_seed("2026-07-01"), 1_161_844_476);
    }

    #[test]
    fn test_date_to_seed_takes_absolute_value_of_negative_hash() {
        // "zzzzzz" overflows into a negative i32 hash
        let hash = "zzzzzz".encode_utf16().fold(0i32, |h, c| {
            h.wrapping_mul(31).wrapping_add(i32::from(c))
        });
        assert_eq!(hash, -685_785_664);
        assert_eq!(date_to_seed("zzzzzz"), 685_785_664);
    }

    #[test]
    fn test_mulberry32_first_draws_are_pinned() {
        let mut rng = Mulberry32::from_date_key("2026-02-10");
        assert_eq!(rng.next_u32(), 69_554_833);
        assert_eq!(rng.next_u32(), 1_849_993_053);

        let mut rng = Mulberry32::from_date_key("2026-02-10");
        assert_eq!(next_unit(&mut rng), 0.016194496536627412);
        assert_eq!(next_unit(&mut rng), 0.43073507328517735);
    }

    #[test]
    fn test_mulberry32_small_seed() {
        let mut rng = Mulberry32::new(97);
        assert_eq!(rng.next_u32(), 2_429_163_745);
    }

    #[test]
    fn test_mulberry32_zero_seed() {
        let mut rng = Mulberry32::new(0);
        assert_eq!(next_unit(&mut rng), 0.26642920868471265);
        assert_eq!(next_unit(&mut rng), 0.0003297457005828619);
    }

    #[test]
    fn test_mulberry32_is_reproducible() {
        let mut a = Mulberry32::new(12345);
        let mut b = Mulberry32::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_mulberry32_wide_outputs_follow_u32_stream() {
        let mut wide = Mulberry32::new(7);
        let mut narrow = Mulberry32::new(7);
        let lo = u64::from(narrow.next_u32());
        let hi = u64::from(narrow.next_u32());
        assert_eq!(wide.next_u64(), (hi << 32) | lo);

        let mut bytes = [0u8; 6];
        let mut narrow = Mulberry32::new(7);
        Mulberry32::new(7).fill_bytes(&mut bytes);
        assert_eq!(bytes[..4], narrow.next_u32().to_le_bytes());
        assert_eq!(bytes[4..], narrow.next_u32().to_le_bytes()[..2]);
    }

    #[test]
    fn test_thread_rng_draws_in_unit_interval() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let v = next_unit(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_pick_index_in_range() {
        let mut rng = Mulberry32::new(42);
        for len in 1..20 {
            assert!(pick_index(&mut rng, len) < len);
        }
    }
}
