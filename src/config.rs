use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub s3_endpoint: String,
    pub s3_bucket: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub s3_region: String,
    pub preferences_table: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "spendwise".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "spendwise-users".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            s3_endpoint: std::env::var("S3_ENDPOINT")?,
            s3_bucket: std::env::var("S3_BUCKET")?,
            s3_access_key: std::env::var("S3_ACCESS_KEY")?,
            s3_secret_key: std::env::var("S3_SECRET_KEY")?,
            s3_region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            preferences_table: std::env::var("PREFERENCES_TABLE")
                .unwrap_or_else(|_| "user-preferences".into()),
        })
    }
}
