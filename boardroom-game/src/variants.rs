//! Seeded cosmetic variation: option order and description copy.
//!
//! Plans are a pure function of `(seed, level_index, counts)`. Scoring never
//! reads them, so two runs with different seeds and the same choices end in
//! the same state.
use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::constants::{DOMAIN_TAG_ORDER, DOMAIN_TAG_VARIANT};
use crate::data::{ChoiceId, ChoicePair};
use crate::numbers::index_below;

/// How one level should be laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayPlan {
    /// Options in on-screen order.
    pub order: [ChoiceId; 2],
    /// Index into each option's description pool.
    pub variant: ChoicePair<usize>,
}

impl Default for DisplayPlan {
    fn default() -> Self {
        Self {
            order: ChoiceId::ALL,
            variant: ChoicePair::new(0, 0),
        }
    }
}

/// Derive an independent per-level stream from the run seed.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8], level_index: usize) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    mac.update(&u64::try_from(level_index).unwrap_or(u64::MAX).to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

fn stream(seed: u64, tag: &[u8], level_index: usize) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, tag, level_index))
}

/// Layout for the level at `level_index` (0-based) given each option's pool size.
#[must_use]
pub fn plan_for_level(seed: u64, level_index: usize, counts: ChoicePair<usize>) -> DisplayPlan {
    let mut order_rng = stream(seed, DOMAIN_TAG_ORDER, level_index);
    let order = if order_rng.next_u64() & 1 == 0 {
        [ChoiceId::A, ChoiceId::B]
    } else {
        [ChoiceId::B, ChoiceId::A]
    };
    let mut variant_rng = stream(seed, DOMAIN_TAG_VARIANT, level_index);
    let a = index_below(variant_rng.next_u64(), counts.a);
    let b = index_below(variant_rng.next_u64(), counts.b);
    DisplayPlan {
        order,
        variant: ChoicePair::new(a, b),
    }
}

/// Pick the description shown for an option, falling back to `base` when the
/// pool is empty.
#[must_use]
pub fn describe<'a>(base: &'a str, variants: &'a [String], index: usize) -> &'a str {
    if variants.is_empty() {
        return base;
    }
    variants[index % variants.len()].as_str()
}
