use serde::Deserialize;

/// Top-level TOML configuration for the claimdesk server.
///
/// Every section has serde defaults so an absent or empty config file yields
/// a runnable local-development instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimdeskConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bind address and externally visible URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// URL clients use to reach this server, when it differs from the bind
    /// address (reverse proxies).
    #[serde(default)]
    pub external_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            external_url: None,
        }
    }
}

/// How bearer tokens are verified.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// `jwks` verifies signatures against the remote key set; `insecure-local`
    /// trusts token claims without verification and exists for development
    /// only. The mode is chosen here, once — never inferred from which other
    /// fields happen to be set.
    #[serde(default = "default_auth_mode")]
    pub mode: AuthMode,
    /// Key-set document URL; required in `jwks` mode.
    #[serde(default)]
    pub jwks_url: Option<String>,
    /// Expected audience claim; unchecked when absent.
    #[serde(default)]
    pub audience: Option<String>,
    /// Seconds between key-set refreshes.
    #[serde(default = "default_jwks_ttl_seconds")]
    pub cache_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: default_auth_mode(),
            jwks_url: None,
            audience: None,
            cache_ttl_seconds: default_jwks_ttl_seconds(),
        }
    }
}

/// Token verification mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    Jwks,
    InsecureLocal,
}

/// Object-storage addressing for upload slots and rendered documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_storage_base_url")]
    pub base_url: String,
    #[serde(default = "default_storage_bucket")]
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_storage_base_url(),
            bucket: default_storage_bucket(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_auth_mode() -> AuthMode {
    AuthMode::InsecureLocal
}

fn default_jwks_ttl_seconds() -> u64 {
    300
}

fn default_storage_base_url() -> String {
    "https://storage.local".to_owned()
}

fn default_storage_bucket() -> String {
    "claim-uploads".to_owned()
}
