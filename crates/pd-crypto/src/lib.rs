use anyhow::{Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD};

pub const SEAL_PREFIX: &str = "FHE-";

const ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Turns a plaintext IP into the ciphertext stored on-chain.
pub trait IpSealer: Send + Sync {
    fn seal(&self, ip_address: &str) -> Result<String>;
}

/// Stand-in for the FHE client: `FHE-` followed by base64 of the plaintext.
/// Nothing about it is confidential.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderFhe;

impl IpSealer for PlaceholderFhe {
    fn seal(&self, ip_address: &str) -> Result<String> {
        if ip_address.trim().is_empty() {
            return Err(anyhow!("ip address cannot be empty"));
        }
        Ok(seal_ip(ip_address))
    }
}

pub fn seal_ip(ip_address: &str) -> String {
    format!("{SEAL_PREFIX}{}", STANDARD.encode(ip_address.as_bytes()))
}

pub fn unseal_ip(sealed: &str) -> Result<String> {
    let body = sealed
        .strip_prefix(SEAL_PREFIX)
        .ok_or_else(|| anyhow!("ciphertext is missing the {SEAL_PREFIX} prefix"))?;
    let bytes = STANDARD
        .decode(body.as_bytes())
        .map_err(|err| anyhow!("ciphertext is not valid base64: {err}"))?;
    String::from_utf8(bytes).map_err(|err| anyhow!("ciphertext is not utf-8: {err}"))
}

/// Creation time plus the entropy used for the id suffix.
///
/// The browser supplies `Date.now()` and `Math.random()`; native callers use
/// [`RecordStamp::now`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordStamp {
    pub issued_at_ms: u64,
    pub entropy: f64,
}

impl RecordStamp {
    pub fn new(issued_at_ms: u64, entropy: f64) -> Self {
        Self {
            issued_at_ms,
            entropy,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn now() -> Result<Self> {
        use std::time::{SystemTime, UNIX_EPOCH};

        let issued_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| anyhow!("time error: {err}"))?
            .as_millis();
        Ok(Self {
            issued_at_ms: u64::try_from(issued_at_ms).unwrap_or(u64::MAX),
            entropy: rand::random::<f64>(),
        })
    }

    pub fn unix_seconds(&self) -> u64 {
        self.issued_at_ms / 1000
    }

    pub fn record_id(&self) -> String {
        record_id(self.issued_at_ms, self.entropy)
    }
}

/// `{issued_at_ms}-{suffix}` where the suffix is the first seven base36
/// fraction digits of `entropy` (a sample from `[0, 1)`).
pub fn record_id(issued_at_ms: u64, entropy: f64) -> String {
    let mut frac = if entropy.is_finite() {
        entropy.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    };

    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        frac *= 36.0;
        let digit = (frac.floor() as usize).min(35);
        frac -= digit as f64;
        suffix.push(BASE36[digit] as char);
    }

    format!("{issued_at_ms}-{suffix}")
}
