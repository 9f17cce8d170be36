use anyhow::{bail, Context};
use jsonwebtoken::Algorithm;

const DEV_SECRET: &str = "dev-secret-key";
const DEFAULT_TTL_MINUTES: i64 = 30;
// one year
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = match std::env::var("SECRET_KEY") {
            Ok(s) if s.is_empty() => bail!("SECRET_KEY is set but empty"),
            Ok(s) => s,
            Err(_) => {
                tracing::warn!("SECRET_KEY not set; using development fallback secret");
                DEV_SECRET.to_string()
            }
        };

        let algorithm = match std::env::var("ALGORITHM") {
            Ok(raw) => parse_algorithm(&raw)?,
            Err(_) => Algorithm::HS256,
        };

        let ttl_minutes = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("ACCESS_TOKEN_EXPIRE_MINUTES is not an integer: {raw}"))?,
            Err(_) => DEFAULT_TTL_MINUTES,
        };
        if !(1..=MAX_TTL_MINUTES).contains(&ttl_minutes) {
            bail!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {ttl_minutes}"
            );
        }

        Ok(Self {
            jwt: JwtConfig {
                secret,
                algorithm,
                ttl_minutes,
            },
        })
    }
}

/// Only the shared-secret (HMAC) family fits a single `SECRET_KEY`.
fn parse_algorithm(raw: &str) -> anyhow::Result<Algorithm> {
    let alg: Algorithm = raw
        .trim()
        .parse()
        .with_context(|| format!("unknown ALGORITHM: {raw}"))?;
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(alg),
        other => bail!("ALGORITHM {other:?} needs a key pair; only HS256/HS384/HS512 are supported"),
    }
}
