use chrono::{Datelike, Utc};
use rand::Rng;

use crate::config::Constants;

/// Generate a registration id such as `NP2024-00042`
pub fn generate_registration_id() -> String {
    let mut rng = rand::rng();
    format_registration_id(
        Utc::now().year(),
        rng.random_range(0..Constants::REGISTRATION_ID_SPACE),
    )
}

pub fn format_registration_id(year: i32, suffix: u32) -> String {
    format!("{}{year}-{suffix:05}", Constants::REGISTRATION_ID_PREFIX)
}
