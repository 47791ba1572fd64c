use serde::Deserialize;

/// Configuration options of the admin backend, loaded from `config/*.yaml`
/// and `APP__*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Maximum accepted JSON body size in bytes.
    pub json_limit_bytes: usize,
    /// Origins allowed to call the API with credentials.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub assets: AssetsConfig,
}

/// Token issuing settings.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

/// Outgoing mail relay settings.
#[derive(Clone, Debug, Deserialize)]
pub struct MailConfig {
    pub relay_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Address used in the `From` header of system emails.
    pub sender: String,
    /// Inbox receiving "contact us" submissions.
    pub contact_receiver: String,
    /// Inbox receiving "consult an expert" submissions.
    pub consult_receiver: String,
}

/// Image hosting service settings.
#[derive(Clone, Debug, Deserialize)]
pub struct AssetsConfig {
    /// Base URL of the asset management API.
    pub base_url: String,
    /// Prefix of URLs under which hosted images are delivered.
    pub delivery_base_url: String,
    #[serde(default)]
    pub api_key: String,
}
