//! Runtime configuration read from the environment.
//!
//! `.env` files are honoured by the binary through `dotenvy` before
//! [`FormsConfig::from_env`] runs.

use std::env::{self, VarError};
use std::path::PathBuf;

use thiserror::Error;

use crate::generators::common::get_static_dir;
use crate::untis::DEFAULT_CLIENT_NAME;

pub const DEFAULT_OUTPUT_DIR: &str = "/vol/files";
pub const DEFAULT_VIEWER_URL: &str = "https://refundable.tech/viewer?uuid=";
pub const DEFAULT_WORKPLACE: &str = "tgm - Schule der Technik";
pub const DEFAULT_TYPST_BIN: &str = "typst";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
    #[error("{var} is set but empty")]
    Empty { var: &'static str },
    #[error("{var} must be an http(s) URL, got '{value}'")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct FormsConfig {
    /// Root of the per-application output directories.
    pub output_dir: PathBuf,
    /// Holds `forms/*.typ` and the workbook templates.
    pub template_dir: PathBuf,
    /// Prefix of the QR code payload; the application id is appended.
    pub viewer_url: String,
    /// Institution name printed on the workbooks.
    pub workplace: String,
    pub typst_bin: PathBuf,
    /// WebUntis JSON-RPC endpoint; timetable-backed kinds need it.
    pub untis_url: Option<String>,
    pub untis_client_name: String,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            template_dir: get_static_dir().to_path_buf(),
            viewer_url: DEFAULT_VIEWER_URL.to_string(),
            workplace: DEFAULT_WORKPLACE.to_string(),
            typst_bin: PathBuf::from(DEFAULT_TYPST_BIN),
            untis_url: None,
            untis_client_name: DEFAULT_CLIENT_NAME.to_string(),
        }
    }
}

impl FormsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var))
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Result<String, VarError>,
    {
        let read = |var: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(var) {
                Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
                Ok(value) => Ok(Some(value.trim().to_string())),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
            }
        };

        let defaults = Self::default();
        let viewer_url = read("FORMS_VIEWER_URL")?.unwrap_or(defaults.viewer_url);
        check_url("FORMS_VIEWER_URL", &viewer_url)?;
        let untis_url = read("UNTIS_URL")?;
        if let Some(url) = &untis_url {
            check_url("UNTIS_URL", url)?;
        }

        Ok(Self {
            output_dir: read("FORMS_OUTPUT_DIR")?
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            template_dir: read("FORMS_TEMPLATE_DIR")?
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            viewer_url,
            workplace: read("FORMS_WORKPLACE")?.unwrap_or(defaults.workplace),
            typst_bin: read("FORMS_TYPST_BIN")?
                .map(PathBuf::from)
                .unwrap_or(defaults.typst_bin),
            untis_url,
            untis_client_name: read("UNTIS_CLIENT_NAME")?.unwrap_or(defaults.untis_client_name),
        })
    }

    /// Payload of the QR code printed on every form of `entity_id`.
    pub fn viewer_link(&self, entity_id: &str) -> String {
        format!("{}{}", self.viewer_url, entity_id)
    }
}

fn check_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            var,
            value: value.to_string(),
        })
    }
}
