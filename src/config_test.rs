use super::*;
use std::sync::Mutex;

// Env vars are process-global; serialize the tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const KEYS: &[&str] = &[
    "DATABASE_URL",
    "PORT",
    "DB_MAX_CONNECTIONS",
    "CSV_BASE_URL",
    "MACHINE_STATUS_SIMULATION",
    "MACHINE_STATUS_INTERVAL_SECS",
    "RETELL_API_KEY",
    "RETELL_BASE_URL",
    "HTTP_REQUEST_TIMEOUT_SECS",
    "HTTP_CONNECT_TIMEOUT_SECS",
];

/// # Safety
/// Callers hold `ENV_LOCK`.
unsafe fn clear_env() {
    for key in KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn from_env_requires_database_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_env() };

    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
}

#[test]
fn from_env_rejects_blank_database_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "   ");
    }

    assert!(AppConfig::from_env().is_err());
    unsafe { clear_env() };
}

#[test]
fn from_env_applies_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/auro");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url, "postgres://localhost/auro");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.csv_base_url, DEFAULT_CSV_BASE_URL);
    assert!(!cfg.machine_status.enabled);
    assert_eq!(cfg.machine_status.interval, Duration::from_secs(DEFAULT_MACHINE_STATUS_INTERVAL_SECS));
    assert_eq!(cfg.retell.api_key, None);
    assert_eq!(cfg.retell.base_url, DEFAULT_RETELL_BASE_URL);
    assert_eq!(cfg.http.request, Duration::from_secs(DEFAULT_HTTP_REQUEST_TIMEOUT_SECS));

    unsafe { clear_env() };
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/auro");
        std::env::set_var("PORT", "8080");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
        std::env::set_var("CSV_BASE_URL", "https://csv.example.test/exports/");
        std::env::set_var("MACHINE_STATUS_SIMULATION", "yes");
        std::env::set_var("MACHINE_STATUS_INTERVAL_SECS", "15");
        std::env::set_var("RETELL_API_KEY", "key_123");
        std::env::set_var("RETELL_BASE_URL", "https://retell.example.test/");
        std::env::set_var("HTTP_CONNECT_TIMEOUT_SECS", "3");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(cfg.csv_base_url, "https://csv.example.test/exports");
    assert!(cfg.machine_status.enabled);
    assert_eq!(cfg.machine_status.interval, Duration::from_secs(15));
    assert_eq!(cfg.retell.api_key.as_deref(), Some("key_123"));
    assert_eq!(cfg.retell.base_url, "https://retell.example.test");
    assert_eq!(cfg.http.connect, Duration::from_secs(3));

    unsafe { clear_env() };
}

#[test]
fn malformed_numbers_fall_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/auro");
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("MACHINE_STATUS_SIMULATION", "maybe");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(!cfg.machine_status.enabled);

    unsafe { clear_env() };
}

#[test]
fn env_bool_accepts_common_spellings() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    for (raw, expected) in [("1", Some(true)), ("ON", Some(true)), ("off", Some(false)), ("nope", None)] {
        unsafe { std::env::set_var("__AURO_TEST_BOOL__", raw) };
        assert_eq!(env_bool("__AURO_TEST_BOOL__"), expected, "raw = {raw}");
    }
    unsafe { std::env::remove_var("__AURO_TEST_BOOL__") };
    assert_eq!(env_bool("__AURO_TEST_BOOL__"), None);
}
