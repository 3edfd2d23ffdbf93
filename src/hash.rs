//! Seeded XXH64 hashing used to derive probe sequences.
//!
//! Two variants share the XXH64 round structure. [`h64`] is the standard
//! XXH64 and provides the home slot of a key. [`h64_alt`] seeds its
//! accumulators differently and provides the probe step. The two are
//! computed independently so that keys sharing a home slot rarely share a
//! step.
//!
//! [`Xxh64`] is the streaming form of either variant and implements
//! [`Hasher`], which lets any `K: Hash` feed its bytes in. [`PairHasher`]
//! drives both variants at once and yields a [`HashPair`].

use core::hash::Hasher;

const PRIME64_1: u64 = 0x9E37_79B1_85EB_CA87;
const PRIME64_2: u64 = 0xC2B2_AE3D_27D4_EB4F;
const PRIME64_3: u64 = 0x1656_67B1_9E37_79F9;
const PRIME64_4: u64 = 0x85EB_CA77_C2B2_AE63;
const PRIME64_5: u64 = 0x27D4_EB2F_1656_67C5;

const STRIPE_LEN: usize = 32;

/// The seed used by tables that are not configured with one explicitly.
pub const DEFAULT_SEED: u64 = 2_718_182;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
    Primary,
    Alternate,
}

impl Variant {
    fn accumulators(self, seed: u64) -> [u64; 4] {
        match self {
            Variant::Primary => [
                seed.wrapping_add(PRIME64_1).wrapping_add(PRIME64_2),
                seed.wrapping_add(PRIME64_2),
                seed,
                seed.wrapping_sub(PRIME64_1),
            ],
            Variant::Alternate => [
                seed.wrapping_add(PRIME64_1).wrapping_add(PRIME64_2),
                seed.wrapping_sub(PRIME64_2),
                seed.wrapping_add(PRIME64_3),
                seed.wrapping_sub(PRIME64_1),
            ],
        }
    }

    fn short_input_base(self, seed: u64) -> u64 {
        match self {
            Variant::Primary => seed.wrapping_add(PRIME64_5),
            Variant::Alternate => seed.wrapping_add(PRIME64_1),
        }
    }
}

#[inline(always)]
fn round(acc: u64, lane: u64) -> u64 {
    acc.wrapping_add(lane.wrapping_mul(PRIME64_2))
        .rotate_left(31)
        .wrapping_mul(PRIME64_1)
}

#[inline(always)]
fn merge_round(acc: u64, val: u64) -> u64 {
    (acc ^ round(0, val))
        .wrapping_mul(PRIME64_1)
        .wrapping_add(PRIME64_4)
}

#[inline(always)]
fn read_u64(bytes: &[u8]) -> u64 {
    let mut lane = [0u8; 8];
    lane.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(lane)
}

#[inline(always)]
fn read_u32(bytes: &[u8]) -> u32 {
    let mut lane = [0u8; 4];
    lane.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(lane)
}

#[inline(always)]
fn consume_stripe(acc: &mut [u64; 4], stripe: &[u8]) {
    for (acc, lane) in acc.iter_mut().zip(stripe.chunks_exact(8)) {
        *acc = round(*acc, read_u64(lane));
    }
}

fn merge_accumulators(acc: &[u64; 4]) -> u64 {
    let [v1, v2, v3, v4] = *acc;
    let mut h = v1
        .rotate_left(1)
        .wrapping_add(v2.rotate_left(7))
        .wrapping_add(v3.rotate_left(12))
        .wrapping_add(v4.rotate_left(18));
    h = merge_round(h, v1);
    h = merge_round(h, v2);
    h = merge_round(h, v3);
    merge_round(h, v4)
}

/// Mixes in the trailing bytes (fewer than one stripe) and avalanches.
fn finalize(mut h: u64, tail: &[u8]) -> u64 {
    let mut lanes = tail.chunks_exact(8);
    for lane in &mut lanes {
        h ^= round(0, read_u64(lane));
        h = h.rotate_left(27).wrapping_mul(PRIME64_1).wrapping_add(PRIME64_4);
    }

    let mut rest = lanes.remainder();
    if rest.len() >= 4 {
        h ^= u64::from(read_u32(rest)).wrapping_mul(PRIME64_1);
        h = h.rotate_left(23).wrapping_mul(PRIME64_2).wrapping_add(PRIME64_3);
        rest = &rest[4..];
    }

    for &byte in rest {
        h ^= u64::from(byte).wrapping_mul(PRIME64_5);
        h = h.rotate_left(11).wrapping_mul(PRIME64_1);
    }

    avalanche(h)
}

#[inline(always)]
fn avalanche(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(PRIME64_2);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME64_3);
    h ^ (h >> 32)
}

fn digest(bytes: &[u8], seed: u64, variant: Variant) -> u64 {
    let mut tail = bytes;
    let mut h = if bytes.len() >= STRIPE_LEN {
        let mut acc = variant.accumulators(seed);
        let mut stripes = bytes.chunks_exact(STRIPE_LEN);
        for stripe in &mut stripes {
            consume_stripe(&mut acc, stripe);
        }
        tail = stripes.remainder();
        merge_accumulators(&acc)
    } else {
        variant.short_input_base(seed)
    };

    h = h.wrapping_add(bytes.len() as u64);
    finalize(h, tail)
}

/// Computes the XXH64 hash of `bytes` with `seed`.
///
/// This is bit-for-bit the reference XXH64 and determines the home slot of a
/// key.
///
/// # Examples
///
/// ```
/// use double_hash::hash::h64;
///
/// assert_eq!(h64(b"", 0), 0xEF46_DB37_51D8_E999);
/// ```
pub fn h64(bytes: &[u8], seed: u64) -> u64 {
    digest(bytes, seed, Variant::Primary)
}

/// Computes the alternate XXH64 variant of `bytes` with `seed`.
///
/// Same rounds as [`h64`], with accumulators seeded `seed + P1 + P2`,
/// `seed - P2`, `seed + P3`, `seed - P1` and short inputs starting from
/// `seed + P1`. Used for the probe step.
pub fn h64_alt(bytes: &[u8], seed: u64) -> u64 {
    digest(bytes, seed, Variant::Alternate)
}

/// Streaming state for either XXH64 variant.
///
/// Feeding the same bytes in any chunking produces the same digest as the
/// one-shot [`h64`] / [`h64_alt`].
#[derive(Clone, Debug)]
pub struct Xxh64 {
    acc: [u64; 4],
    buffer: [u8; STRIPE_LEN],
    buffered: usize,
    total_len: u64,
    seed: u64,
    variant: Variant,
}

impl Xxh64 {
    /// Creates a streaming [`h64`] state.
    pub fn new(seed: u64) -> Self {
        Self::with_variant(seed, Variant::Primary)
    }

    /// Creates a streaming [`h64_alt`] state.
    pub fn new_alt(seed: u64) -> Self {
        Self::with_variant(seed, Variant::Alternate)
    }

    fn with_variant(seed: u64, variant: Variant) -> Self {
        Self {
            acc: variant.accumulators(seed),
            buffer: [0; STRIPE_LEN],
            buffered: 0,
            total_len: 0,
            seed,
            variant,
        }
    }

    /// Feeds `bytes` into the state.
    pub fn update(&mut self, bytes: &[u8]) {
        self.total_len = self.total_len.wrapping_add(bytes.len() as u64);
        let mut input = bytes;

        if self.buffered > 0 {
            let take = (STRIPE_LEN - self.buffered).min(input.len());
            self.buffer[self.buffered..self.buffered + take]
                .copy_from_slice(&input[..take]);
            self.buffered += take;
            input = &input[take..];

            if self.buffered < STRIPE_LEN {
                return;
            }
            consume_stripe(&mut self.acc, &self.buffer);
            self.buffered = 0;
        }

        let mut stripes = input.chunks_exact(STRIPE_LEN);
        for stripe in &mut stripes {
            consume_stripe(&mut self.acc, stripe);
        }

        let rest = stripes.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffered = rest.len();
    }

    /// Returns the digest of everything fed so far. The state is unchanged.
    pub fn digest(&self) -> u64 {
        let mut h = if self.total_len >= STRIPE_LEN as u64 {
            merge_accumulators(&self.acc)
        } else {
            self.variant.short_input_base(self.seed)
        };
        h = h.wrapping_add(self.total_len);
        finalize(h, &self.buffer[..self.buffered])
    }
}

impl Hasher for Xxh64 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.digest()
    }
}

/// The two hashes that define a key's probe sequence.
///
/// Attempt `i` visits slot `(home + i * step) mod capacity`. `step` is always
/// odd, so with a power-of-two capacity the sequence visits every slot before
/// repeating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashPair {
    /// The primary hash, selecting the first slot probed.
    pub home: u64,
    /// The probe increment. Always odd.
    pub step: u64,
}

impl HashPair {
    /// Builds a pair, forcing the step odd.
    #[inline]
    pub const fn new(home: u64, step: u64) -> Self {
        Self {
            home,
            step: step | 1,
        }
    }

    /// Hashes a byte string with both variants.
    pub fn of_bytes(bytes: &[u8], seed: u64) -> Self {
        Self::new(h64(bytes, seed), h64_alt(bytes, seed))
    }

    /// Returns the slot index for the zero-based probe `attempt` in a table
    /// whose slot count is `mask + 1`.
    #[inline]
    pub(crate) fn probe(&self, attempt: usize, mask: usize) -> usize {
        (self.home.wrapping_add((attempt as u64).wrapping_mul(self.step)) as usize) & mask
    }
}

/// A [`Hasher`] that runs both XXH64 variants over the same input.
///
/// [`Hasher::finish`] reports the primary hash; [`PairHasher::pair`] reports
/// both.
#[derive(Clone, Debug)]
pub struct PairHasher {
    home: Xxh64,
    step: Xxh64,
}

impl PairHasher {
    /// Creates a hasher for both variants with the same `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            home: Xxh64::new(seed),
            step: Xxh64::new_alt(seed),
        }
    }

    /// Returns the hash pair of everything written so far.
    pub fn pair(&self) -> HashPair {
        HashPair::new(self.home.digest(), self.step.digest())
    }
}

impl Hasher for PairHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.home.update(bytes);
        self.step.update(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.home.digest()
    }
}
