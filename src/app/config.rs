/// Centralized environment configuration.
/// All env vars and defaults are defined here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. Required.
    pub database_url: String,

    /// Socket address the HTTP server binds to.
    /// Default: 0.0.0.0:3000
    pub bind_addr: String,

    /// Base URL for generating invitation links.
    /// Default: http://localhost:3000
    pub app_url: String,

    /// Lifetime of a sign-in session, in days.
    /// Default: 30
    pub session_ttl_days: i64,

    /// How many organizations a single user may belong to before creation is refused.
    /// Default: 5
    pub max_organizations_per_user: i64,

    /// From/reply address for outgoing emails.
    /// Default: please-configure@example.com
    pub mail_from: String,

    /// Mail adapter: "console" or "smtp".
    /// Default: console
    pub mail_adapter: String,

    /// SMTP host. Required when mail_adapter=smtp.
    pub smtp_host: Option<String>,

    /// SMTP port.
    /// Default: 587
    pub smtp_port: u16,

    /// SMTP username. Optional for some servers.
    pub smtp_user: Option<String>,

    /// SMTP password. Optional for some servers.
    pub smtp_pass: Option<String>,
}

impl Config {
    /// Build config from environment variables.
    /// Returns an error if required vars are missing or malformed.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL").ok_or("DATABASE_URL must be set in .env")?;

        let session_ttl_days = var_or("SESSION_TTL_DAYS", "30")
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or("SESSION_TTL_DAYS must be a positive number of days")?;

        let max_organizations_per_user = var_or("MAX_ORGANIZATIONS_PER_USER", "5")
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or("MAX_ORGANIZATIONS_PER_USER must be a positive number")?;

        let smtp_port = var_or("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|_| "SMTP_PORT must be a valid port number")?;

        Ok(Self {
            database_url,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            app_url: var_or("APP_URL", "http://localhost:3000"),
            session_ttl_days,
            max_organizations_per_user,
            mail_from: var_or("MAIL_FROM", "please-configure@example.com"),
            mail_adapter: var_or("MAIL_ADAPTER", "console"),
            smtp_host: lookup("SMTP_HOST"),
            smtp_port,
            smtp_user: lookup("SMTP_USER"),
            smtp_pass: lookup("SMTP_PASS"),
        })
    }

    /// Returns the base URL without trailing slash, for building links.
    pub fn app_url_base(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }

    /// Link an invitee follows to accept an invitation.
    pub fn invitation_link(&self, invitation_id: &str) -> String {
        format!("{}/invite/{}", self.app_url_base(), invitation_id)
    }

    /// Config for tests. Uses in-memory database URL and console mailer.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            app_url: "http://localhost:3000".to_string(),
            session_ttl_days: 30,
            max_organizations_per_user: 5,
            mail_from: "test@example.com".to_string(),
            mail_adapter: "console".to_string(),
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
        }
    }
}
