//! Reversible share-code scheme.
//! Code format: <VARIANT>-<WORD><NN>, e.g., TK-PIVOT42, SC-MOAT07

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which game a share code replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    Ticker,
    Scorecard,
}

impl GameVariant {
    pub const ALL: [Self; 2] = [Self::Ticker, Self::Scorecard];

    /// Two-letter prefix used in share codes.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ticker => "TK",
            Self::Scorecard => "SC",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Scorecard => "scorecard",
        }
    }

    const fn domain_byte(self) -> u8 {
        match self {
            Self::Ticker => b'T',
            Self::Scorecard => b'S',
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GameVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|variant| variant.key().eq_ignore_ascii_case(needle))
            .or_else(|| Self::from_code(needle))
            .ok_or_else(|| format!("unknown variant '{s}' (expected ticker or scorecard)"))
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// Word list for share codes
pub const WORD_LIST: [&str; 64] = [
    "PIVOT", "MOAT", "PILOT", "SCALE", "AUDIT", "BOARD", "PROXY", "MERGER", "BUYBACK", "MARGIN",
    "LEDGER", "QUORUM", "CHARTER", "TICKER", "BULL", "BEAR", "RALLY", "HEDGE", "YIELD", "ALPHA",
    "SIGMA", "VECTOR", "MODEL", "TENSOR", "CLOUD", "ROADMAP", "SPRINT", "VISION", "MISSION",
    "TRUST", "TALENT", "RISK", "VALUE", "BREACH", "RIVAL", "LAUNCH", "RECALL", "REBOOT", "CAPEX",
    "OPEX", "EBITDA", "GUIDANCE", "FORECAST", "QUARTER", "SUMMIT", "KEYNOTE", "MEMO", "BRIEF",
    "AGENDA", "MINUTES", "GAVEL", "PROXIES", "ANALYST", "UPGRADE", "RUNWAY", "BURN", "HORIZON",
    "ANCHOR", "COMPASS", "BEACON", "LEVER", "ENGINE", "SIGNAL", "VERDICT",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    let nn = u8::try_from((packed >> 9) & 0x7F).unwrap_or(0);
    (packed & 0x01FF, nn)
}

fn compose_seed(variant: GameVariant, word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let [lo, hi] = packed.to_le_bytes();
    // Domain-separated FNV input
    let mut buf = [0u8; 10];
    buf[..6].copy_from_slice(b"BOARD-");
    buf[6] = variant.domain_byte();
    buf[7] = lo;
    buf[8] = hi;
    buf[9] = 0xA5;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

#[must_use]
pub fn encode_friendly(variant: GameVariant, seed: u64) -> String {
    let packed = u16::try_from(seed & 0xFFFF).unwrap_or(0);
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST
        .get(usize::from(wi))
        .copied()
        .unwrap_or(WORD_LIST[0]);
    if nn > 99 {
        nn %= 100;
    }
    format!("{}-{word}{nn:02}", variant.code())
}

#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(GameVariant, u64)> {
    let s = code.trim();
    let (prefix, rest) = s.split_once('-')?;
    let variant = GameVariant::from_code(prefix)?;
    if rest.len() < 3 || !rest.is_ascii() {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some((variant, compose_seed(variant, wi, nn)))
}

#[must_use]
pub fn generate_code_from_entropy(variant: GameVariant, entropy: u64) -> String {
    let words = u64::try_from(WORD_LIST.len()).unwrap_or(1);
    let wi = u16::try_from(entropy % words).unwrap_or(0);
    let nn = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    encode_friendly(variant, compose_seed(variant, wi, nn))
}

/// Parse a share code into its variant and seed.
#[must_use]
pub fn parse_share_code(code: &str) -> Option<(GameVariant, u64)> {
    decode_to_seed(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrips_code() {
        let seed = 0xDEAD_BEEF_CAFE_BABE;
        let code = encode_friendly(GameVariant::Scorecard, seed);
        let (variant, new_seed) = decode_to_seed(&code).unwrap();
        assert_eq!(variant, GameVariant::Scorecard);
        assert_eq!(encode_friendly(GameVariant::Scorecard, new_seed), code);
    }

    #[test]
    fn tk_pivot_42_stable() {
        let (variant, seed) = decode_to_seed("TK-PIVOT42").unwrap();
        assert_eq!(variant, GameVariant::Ticker);
        assert_eq!(encode_friendly(GameVariant::Ticker, seed), "TK-PIVOT42");
        assert_eq!(decode_to_seed("tk-pivot42"), Some((variant, seed)));
    }

    #[test]
    fn variants_get_distinct_seeds_for_the_same_word() {
        let (_, ticker) = parse_share_code("TK-MOAT07").unwrap();
        let (_, scorecard) = parse_share_code("SC-MOAT07").unwrap();
        assert_ne!(ticker, scorecard);
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert_eq!(decode_to_seed("XX-PIVOT42"), None);
        assert_eq!(decode_to_seed("TK-NOTAWORD42"), None);
        assert_eq!(decode_to_seed("TK-PIVOTAB"), None);
        assert_eq!(decode_to_seed("TK-P"), None);
        assert_eq!(decode_to_seed("PIVOT42"), None);
    }

    #[test]
    fn entropy_codes_decode() {
        for entropy in [0_u64, 1, 99, 0xFFFF_FFFF, u64::MAX] {
            let code = generate_code_from_entropy(GameVariant::Ticker, entropy);
            assert!(code.starts_with("TK-"));
            let (variant, seed) = decode_to_seed(&code).unwrap();
            assert_eq!(variant, GameVariant::Ticker);
            assert_eq!(encode_friendly(variant, seed), code);
        }
    }

    #[test]
    fn variant_parses_from_name_or_code() {
        assert_eq!("Scorecard".parse::<GameVariant>().unwrap(), GameVariant::Scorecard);
        assert_eq!("tk".parse::<GameVariant>().unwrap(), GameVariant::Ticker);
        assert!("both".parse::<GameVariant>().is_err());
    }
}
