use std::path::PathBuf;

use anyhow::{anyhow, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    pub endpoint: Option<String>,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub public_url: String,
}

/// Where uploaded announcement images end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Local,
    S3(S3Config),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| anyhow!("{key} must be set"));

        let database = match var("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: required("DB_HOST")?,
                port: var("DB_PORT")
                    .map(|v| v.parse::<u16>())
                    .transpose()
                    .context("invalid DB_PORT")?
                    .unwrap_or(5432),
                user: required("DB_USER")?,
                password: required("DB_PASS")?,
                name: required("DB_NAME")?,
            },
        };

        let host = var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = var("APP_PORT")
            .map(|v| v.parse::<u16>())
            .transpose()
            .context("invalid APP_PORT")?
            .unwrap_or(8080);
        let uploads_dir = PathBuf::from(var("UPLOADS_DIR").unwrap_or_else(|| "uploads".into()));

        let storage = match (var("S3_ACCESS_KEY"), var("S3_SECRET_KEY")) {
            (Some(access_key), Some(secret_key)) => {
                let bucket = required("S3_BUCKET")?;
                let region = var("S3_REGION").unwrap_or_else(|| "us-east-1".into());
                let endpoint = var("S3_ENDPOINT").map(|e| e.trim_end_matches('/').to_string());
                let public_url = var("S3_PUBLIC_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| match &endpoint {
                        Some(e) => format!("{e}/{bucket}"),
                        None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
                    });
                StorageConfig::S3(S3Config {
                    endpoint,
                    bucket,
                    region,
                    access_key,
                    secret_key,
                    public_url,
                })
            }
            (None, None) => StorageConfig::Local,
            _ => anyhow::bail!("S3_ACCESS_KEY and S3_SECRET_KEY must be set together"),
        };

        Ok(Self {
            database,
            host,
            port,
            uploads_dir,
            storage,
        })
    }
}
