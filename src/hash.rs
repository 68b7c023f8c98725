//! Hash builders for `OpenMap`.
//!
//! The default is hashbrown's randomly seeded builder. `BuildPoly31Hasher` is
//! a fixed, seedless alternative: the classic `h = 31 * h + x` string hash
//! over 32-bit wrapping arithmetic. It is deterministic across runs and
//! platforms, which makes bucket layouts reproducible and collisions easy to
//! construct, and it is not resistant to adversarial keys.

use core::hash::{BuildHasher, Hasher};

pub use hashbrown::hash_map::DefaultHashBuilder;

/// Streaming polynomial hasher; see the module docs.
#[derive(Clone, Copy, Debug, Default)]
pub struct Poly31Hasher {
    state: u32,
}

impl Poly31Hasher {
    #[inline]
    fn mix(&mut self, x: u32) {
        self.state = self.state.wrapping_mul(31).wrapping_add(x);
    }
}

impl Hasher for Poly31Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.mix(u32::from(b));
        }
    }

    // Integers are folded by value so the result does not depend on byte order.
    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(u32::from(i));
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.mix(u32::from(i));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(i);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix((i ^ (i >> 32)) as u32);
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.write_u64(i as u64);
        self.write_u64((i >> 64) as u64);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn write_i8(&mut self, i: i8) {
        self.mix(i as u32);
    }

    #[inline]
    fn write_i16(&mut self, i: i16) {
        self.mix(i as u32);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.mix(i as u32);
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn write_isize(&mut self, i: isize) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        u64::from(self.state)
    }
}

/// `BuildHasher` for `Poly31Hasher`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildPoly31Hasher;

impl BuildHasher for BuildPoly31Hasher {
    type Hasher = Poly31Hasher;

    fn build_hasher(&self) -> Poly31Hasher {
        Poly31Hasher::default()
    }
}
