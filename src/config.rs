use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub reset_link_base: String,
    pub upload_dir: PathBuf,
    pub max_body_size: usize,
    pub db_acquire_timeout_secs: u64,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;
        let jwt_refresh_secret = env_required("JWT_REFRESH_SECRET")?;

        if jwt_secret == jwt_refresh_secret {
            return Err("JWT_SECRET and JWT_REFRESH_SECRET must differ".to_string());
        }

        let host: IpAddr = env_or("DAHLIA_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid DAHLIA_HOST: {e}"))?;

        let default_port = env_or("PORT", "3000");
        let port: u16 = env_or("DAHLIA_PORT", &default_port)
            .parse()
            .map_err(|e| format!("Invalid DAHLIA_PORT: {e}"))?;

        let reset_link_base = env_or("DAHLIA_RESET_LINK_BASE", "dahlia://reset");
        let upload_dir = PathBuf::from(env_or("DAHLIA_UPLOAD_DIR", "upload"));

        let max_body_size: usize = env_or("DAHLIA_MAX_BODY_SIZE", "5242880")
            .parse()
            .map_err(|e| format!("Invalid DAHLIA_MAX_BODY_SIZE: {e}"))?;

        let db_acquire_timeout_secs: u64 = env_or("DAHLIA_DB_ACQUIRE_TIMEOUT_SECS", "5")
            .parse()
            .map_err(|e| format!("Invalid DAHLIA_DB_ACQUIRE_TIMEOUT_SECS: {e}"))?;

        let log_level = env_or("DAHLIA_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("DAHLIA_SMTP_HOST").ok(),
            std::env::var("DAHLIA_SMTP_PORT").ok(),
            std::env::var("DAHLIA_SMTP_USER").ok(),
            std::env::var("DAHLIA_SMTP_PASS").ok(),
            std::env::var("DAHLIA_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid DAHLIA_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_refresh_secret,
            host,
            port,
            reset_link_base,
            upload_dir,
            max_body_size,
            db_acquire_timeout_secs,
            log_level,
            smtp,
        })
    }

    pub fn profile_image_dir(&self) -> PathBuf {
        self.upload_dir.join("profile_images")
    }
}

/// Settings for the standalone chatbot proxy.
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    pub api_key: String,
    pub host: IpAddr,
    pub port: u16,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl ChatbotConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_key = env_required("GEMINI_API_KEY")?;

        let host: IpAddr = env_or("CHATBOT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CHATBOT_HOST: {e}"))?;

        let port: u16 = env_or("CHATBOT_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid CHATBOT_PORT: {e}"))?;

        let timeout_secs: u64 = env_or("CHATBOT_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid CHATBOT_TIMEOUT_SECS: {e}"))?;

        Ok(ChatbotConfig {
            api_key,
            host,
            port,
            model: env_or("GEMINI_MODEL", "gemini-2.5-flash"),
            base_url: env_or("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com"),
            timeout_secs,
            log_level: env_or("CHATBOT_LOG_LEVEL", "info"),
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
