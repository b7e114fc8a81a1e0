use dotenvy::dotenv;
use envmode::EnvMode;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_ANALYZE_URL: &str = "http://localhost:8000/analyze_mesh/";

#[derive(Debug, Validate, Deserialize)]
pub struct Env {
    #[validate(url(message = "ANALYZE_URL must be a valid URL"))]
    #[serde(default = "default_analyze_url")]
    pub analyze_url: String,

    #[serde(default = "default_environment", deserialize_with = "deserialize_arc_str")]
    pub environment: Arc<str>,
}

fn default_analyze_url() -> String {
    DEFAULT_ANALYZE_URL.to_string()
}

fn default_environment() -> Arc<str> {
    let mode: String = EnvMode::Dev.into();
    mode.into()
}

fn deserialize_arc_str<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = String::deserialize(deserializer)?;
    Ok(s.into())
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    /// Reads `.env` and the process environment, exiting on invalid values.
    pub fn new() -> Self {
        let _ = dotenv();

        Self::from_vars(std::env::vars()).unwrap_or_else(|message| {
            log::error!("Environment variable error: {}, exiting ... ", message);
            std::process::exit(1);
        })
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: Self = envy::from_iter(vars).map_err(|e| e.to_string())?;
        env.validate().map_err(|e| first_message(&e))?;
        Ok(env)
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|e| e.iter())
        .filter_map(|err| {
            err.message
                .as_ref()
                .map(|msg| msg.to_string())
                .or(Some(String::from("invalid value")))
        })
        .next()
        .unwrap_or(String::from("invalid value"))
}

pub static ENV: Lazy<Env> = Lazy::new(Env::new);
