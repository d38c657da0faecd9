use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_path: env::var("HEALTH_LOG_PATH")
                .unwrap_or_else(|_| "health_log.csv".into())
                .into(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            // Also allow LAN access in dev (e.g. logging from a phone)
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr() {
        let config = Config {
            log_path: "health_log.csv".into(),
            host: "127.0.0.1".into(),
            port: 9000,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: vec![],
        };
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
    }
}
