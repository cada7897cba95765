use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Default page size for paginated listings when the client sends no `limit`.
    pub page_size: i64,
    pub body_limit_bytes: usize,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let page_size = env::var("APP_PAGE_SIZE")
            .ok()
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(6);
        let body_limit_bytes = env::var("APP_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(5 * 1024 * 1024);
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(10);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            page_size,
            body_limit_bytes,
            max_connections,
        })
    }
}
