use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::pronunciation::profile::ScoringProfile;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub profile: ScoringProfile,
    /// File the profile was read from, if it did not come from the built-in table.
    pub profile_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(custom) => {
                let profile = load_profile(&custom)?;
                info!(path = %custom.display(), "loaded scoring profile");
                Ok(Self {
                    profile,
                    profile_path: Some(custom),
                })
            }
            None => Ok(Self {
                profile: ScoringProfile::standard(),
                profile_path: None,
            }),
        }
    }
}

fn load_profile(path: &Path) -> Result<ScoringProfile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read scoring profile at {:?}", path))?;
    parse_profile(&data).with_context(|| format!("invalid scoring profile in {:?}", path))
}

fn parse_profile(raw: &str) -> Result<ScoringProfile> {
    let profile: ScoringProfile =
        serde_json::from_str(raw).context("failed to parse scoring profile JSON")?;
    profile.validate()?;
    Ok(profile)
}
