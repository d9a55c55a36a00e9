use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub completion_api_base: String,
    pub completion_model: String,
    pub completion_temperature: f32,
    pub completion_max_tokens: u32,
    pub proxy_base_url: String,
    pub direct_fetch_timeout_secs: u64,
    pub rate_limit_per_minute: usize,
    pub ideogram_api_base: String,
    pub higgsfield_api_base: String,
}

/// Connection details for the hosted backend (auth + settings tables).
#[derive(Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
}

impl std::fmt::Debug for SupabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseSettings")
            .field("url", &self.url)
            .field("anon_key", &"[redacted]")
            .field("service_role_key", &"[redacted]")
            .finish()
    }
}

impl AppConfig {
    /// Returns the backend settings, or the first missing variable.
    ///
    /// The CLI never needs these; the server refuses to start without them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first unset variable.
    pub fn supabase(&self) -> Result<SupabaseSettings, ConfigError> {
        let missing = |var: &str| ConfigError::MissingEnvVar(var.to_string());
        Ok(SupabaseSettings {
            url: self
                .supabase_url
                .clone()
                .ok_or_else(|| missing("SUPABASE_URL"))?,
            anon_key: self
                .supabase_anon_key
                .clone()
                .ok_or_else(|| missing("SUPABASE_ANON_KEY"))?,
            service_role_key: self
                .supabase_service_role_key
                .clone()
                .ok_or_else(|| missing("SUPABASE_SERVICE_ROLE_KEY"))?,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_anon_key",
                &self.supabase_anon_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "supabase_service_role_key",
                &self.supabase_service_role_key.as_ref().map(|_| "[redacted]"),
            )
            .field("completion_api_base", &self.completion_api_base)
            .field("completion_model", &self.completion_model)
            .field("completion_temperature", &self.completion_temperature)
            .field("completion_max_tokens", &self.completion_max_tokens)
            .field("proxy_base_url", &self.proxy_base_url)
            .field(
                "direct_fetch_timeout_secs",
                &self.direct_fetch_timeout_secs,
            )
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("ideogram_api_base", &self.ideogram_api_base)
            .field("higgsfield_api_base", &self.higgsfield_api_base)
            .finish()
    }
}
