use anyhow::{Result, bail};
use boardroom_game::{GameVariant, encode_friendly, generate_code_from_entropy, parse_share_code};
use chrono::Utc;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static SHARE_CODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?i)(TK|SC)-[A-Z]+[0-9]{2}$").ok());

/// Seed metadata resolved from the command line.
#[derive(Debug, Clone)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    pub source_variant: Option<GameVariant>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            source_variant: None,
        }
    }

    #[must_use]
    pub fn from_share_code(seed: u64, variant: GameVariant, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            source_variant: Some(variant),
        }
    }

    /// Share codes only replay the variant they were minted for.
    #[must_use]
    pub fn matches_variant(&self, variant: GameVariant) -> bool {
        self.source_variant.is_none_or(|source| source == variant)
    }

    #[must_use]
    pub fn share_code_for(&self, variant: GameVariant) -> String {
        if let (Some(code), Some(source)) = (&self.code, self.source_variant)
            && source == variant
        {
            return code.clone();
        }
        encode_friendly(variant, self.seed)
    }
}

fn looks_like_share_code(token: &str) -> bool {
    SHARE_CODE
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(token))
}

/// Resolve CLI seed tokens: integers, share codes such as `TK-PIVOT42`, and
/// `fresh`, which mints one new code per variant from the clock.
///
/// # Errors
///
/// Fails on a token that is neither a number nor a known share code.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("fresh") {
            let entropy = Utc::now()
                .timestamp_nanos_opt()
                .map_or(0, i64::unsigned_abs);
            for variant in GameVariant::ALL {
                let code = generate_code_from_entropy(variant, entropy);
                if let Some((variant, seed)) = parse_share_code(&code) {
                    pending.push(SeedInfo::from_share_code(seed, variant, code));
                }
            }
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if looks_like_share_code(token) {
            if let Some((variant, seed)) = parse_share_code(token) {
                pending.push(SeedInfo::from_share_code(seed, variant, token.to_uppercase()));
                continue;
            }
            bail!("Share code {token} does not use a known word");
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<(u64, Option<GameVariant>), usize> = HashMap::new();

    for info in pending {
        let key = (info.seed, info.source_variant);
        if let Some(&existing) = index.get(&key) {
            if let Some(entry) = deduped.get_mut(existing)
                && entry.code.is_none()
                && info.code.is_some()
            {
                *entry = info;
            }
        } else {
            index.insert(key, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}
