use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration as StdDuration;

pub struct EnvVars;

impl EnvVars {
    pub fn bind_addr() -> SocketAddr {
        parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))
    }

    pub fn cors_allowed_origins() -> Vec<String> {
        env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| Constants::DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Alternate client address header consulted after `x-forwarded-for`
    pub fn client_ip_header() -> String {
        env::var("CLIENT_IP_HEADER")
            .map(|header| header.trim().to_ascii_lowercase())
            .ok()
            .filter(|header| !header.is_empty())
            .unwrap_or_else(|| "x-real-ip".to_string())
    }

    pub fn store_timeout() -> StdDuration {
        StdDuration::from_millis(parse_or("STORE_TIMEOUT_MS", 5_000u64))
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{key}={raw:?} is not valid, using {default}");
            default
        }),
        Err(_) => default,
    }
}

pub struct Constants;

impl Constants {
    pub const MAX_REGISTRATION_ATTEMPTS: usize = 5;

    pub const RATE_LIMIT_WINDOW: StdDuration = StdDuration::from_secs(15 * 60);

    /// Upper bound between sweeps of idle rate-limit clients
    pub const RATE_LIMIT_SWEEP_INTERVAL: StdDuration = StdDuration::from_secs(60);

    pub const REGISTRATION_ID_PREFIX: &'static str = "NP";

    /// Exclusive upper bound of the random id suffix
    pub const REGISTRATION_ID_SPACE: u32 = 100_000;

    pub const MAX_ID_ATTEMPTS: usize = 10;

    pub const UNKNOWN_CLIENT: &'static str = "unknown";

    pub const FORWARDED_FOR_HEADER: &'static str = "x-forwarded-for";

    pub const DEFAULT_CORS_ORIGINS: &'static str =
        "http://localhost:3000,https://naturepot.vercel.app";

    pub const IDEA_DESCRIPTION_MAX_LENGTH: usize = 140;

    pub const REGISTRATION_SUCCESS_MESSAGE: &'static str =
        "Registration successful! Check your email for confirmation.";
}
