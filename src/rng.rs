// xoroshiro128+ from http://xoroshiro.di.unimi.it/xoroshiro128plus.c

/// Deterministic random source for one world. Not thread-safe by design;
/// every world owns its own instance.
pub struct Xoroshiro128Plus {
    s: [u64; 2],
}

impl Xoroshiro128Plus {
    pub fn new(seed: u64) -> Self {
        Self { s: [1, seed] }
    }

    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.s[0];
        let mut s1 = self.s[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.s[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.s[1] = s1.rotate_left(37);

        result
    }

    /// Uniform float in [0, 1): low 23 generator bits become the mantissa of
    /// a float in [1, 2), then 1.0 is subtracted.
    pub fn next_f32(&mut self) -> f32 {
        let mantissa = self.next_u64() as u32 & ((1 << 23) - 1);
        f32::from_bits(0x3F80_0000 | mantissa) - 1.0
    }
}
