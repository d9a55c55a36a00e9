use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, without `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_temperature = |var: &str, default: &str| -> Result<f32, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !(0.0..=2.0).contains(&value) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("{value} is outside 0.0..=2.0"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("FREYJA_ENV", "development"));

    let bind_addr = parse("FREYJA_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FREYJA_LOG_LEVEL", "info");

    let supabase_url = optional("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string());
    let supabase_anon_key = optional("SUPABASE_ANON_KEY");
    let supabase_service_role_key = optional("SUPABASE_SERVICE_ROLE_KEY");

    let completion_api_base = or_default("FREYJA_COMPLETION_API_BASE", "https://api.openai.com/v1")
        .trim_end_matches('/')
        .to_string();
    let completion_model = or_default("FREYJA_COMPLETION_MODEL", "gpt-4o-mini");
    let completion_temperature = parse_temperature("FREYJA_COMPLETION_TEMPERATURE", "0.3")?;
    let completion_max_tokens = parse_u32("FREYJA_COMPLETION_MAX_TOKENS", "800")?;

    let proxy_base_url = or_default("FREYJA_PROXY_BASE_URL", "https://r.jina.ai")
        .trim_end_matches('/')
        .to_string();
    let direct_fetch_timeout_secs = parse_u64("FREYJA_DIRECT_FETCH_TIMEOUT_SECS", "8")?;
    let rate_limit_per_minute = parse_usize("FREYJA_RATE_LIMIT_PER_MINUTE", "120")?;

    let ideogram_api_base = or_default("FREYJA_IDEOGRAM_API_BASE", "https://api.ideogram.ai")
        .trim_end_matches('/')
        .to_string();
    let higgsfield_api_base =
        or_default("FREYJA_HIGGSFIELD_API_BASE", "https://platform.higgsfield.ai")
            .trim_end_matches('/')
            .to_string();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        supabase_url,
        supabase_anon_key,
        supabase_service_role_key,
        completion_api_base,
        completion_model,
        completion_temperature,
        completion_max_tokens,
        proxy_base_url,
        direct_fetch_timeout_secs,
        rate_limit_per_minute,
        ideogram_api_base,
        higgsfield_api_base,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
