use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::model::shift::ShiftSchedule;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Wall-clock time of the daily same-day absence sweep.
    pub sweep_time: NaiveTime,
    /// How far back the startup backfill sweep looks.
    pub backfill_days: u32,
    /// Shift boundaries for tenants without a configured schedule.
    pub default_shift: ShiftSchedule,
}

fn env_time(key: &str, default: &str) -> NaiveTime {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M:%S")
        .unwrap_or_else(|_| panic!("{} must be HH:MM:SS, got {}", key, raw))
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            sweep_time: env_time("SWEEP_TIME", "10:30:00"),
            backfill_days: env::var("BACKFILL_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            default_shift: ShiftSchedule {
                shift_start: env_time("SHIFT_START", "09:00:00"),
                grace_end: env_time("SHIFT_GRACE_END", "09:10:00"),
                late_end: env_time("SHIFT_LATE_END", "09:30:00"),
                half_day_start: env_time("SHIFT_HALF_DAY_START", "10:00:00"),
                shift_end: env_time("SHIFT_END", "19:00:00"),
            },
        }
    }
}
