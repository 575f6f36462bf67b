use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub fal_api_key: Option<String>,
    pub fal_base_url: String,
    pub fal_model: String,
    pub num_output_images: u32,
    pub output_format: String,
    pub upstream_timeout_secs: u64,
    pub port: u16,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let fal_api_key = env::var("FAL_API_KEY").ok().filter(|k| !k.is_empty());
        let fal_base_url =
            env::var("FAL_BASE_URL").unwrap_or_else(|_| "https://fal.run".to_string());
        let fal_model =
            env::var("FAL_MODEL").unwrap_or_else(|_| "fal-ai/nano-banana/edit".to_string());
        let num_output_images = env::var("NUM_OUTPUT_IMAGES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let output_format = env::var("OUTPUT_FORMAT").unwrap_or_else(|_| "jpeg".to_string());
        let upstream_timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        let google_client_id = env::var("GOOGLE_CLIENT_ID").ok().filter(|v| !v.is_empty());
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .ok()
            .filter(|v| !v.is_empty());

        Self {
            database_url,
            jwt_secret,
            fal_api_key,
            fal_base_url,
            fal_model,
            num_output_images,
            output_format,
            upstream_timeout_secs,
            port,
            google_client_id,
            google_client_secret,
        }
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
