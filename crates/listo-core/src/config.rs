use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the per-project directory holding config and data.
pub const PROJECT_DIR: &str = ".listo";

const COOKIE_FILE: &str = "cookies.txt";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `store.json`. Relative paths are resolved against
    /// the project root.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Legacy cookie file to migrate from. Defaults to `<data_dir>/cookies.txt`.
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub data_dir: PathBuf,
    pub cookie_file: PathBuf,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(PROJECT_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("listo/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Merge project and user config with CLI and environment overrides.
///
/// Data directory precedence: `cli_data_dir` > `LISTO_DATA_DIR` > project
/// config > user config > `<project_root>/.listo`.
pub fn resolve_config(project_root: &Path, cli_data_dir: Option<&Path>) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_data_dir = env::var_os("LISTO_DATA_DIR").map(PathBuf::from);
    let data_dir = resolve_data_dir(
        project_root,
        cli_data_dir,
        env_data_dir.as_deref(),
        &project,
        &user,
    );
    let cookie_file = project
        .storage
        .cookie_file
        .as_ref()
        .map_or_else(|| data_dir.join(COOKIE_FILE), |p| project_root.join(p));

    Ok(EffectiveConfig {
        project,
        user,
        data_dir,
        cookie_file,
    })
}

fn resolve_data_dir(
    project_root: &Path,
    cli_data_dir: Option<&Path>,
    env_data_dir: Option<&Path>,
    project: &ProjectConfig,
    user: &UserConfig,
) -> PathBuf {
    if let Some(dir) = cli_data_dir.or(env_data_dir) {
        return project_root.join(dir);
    }
    if let Some(dir) = &project.storage.data_dir {
        return project_root.join(dir);
    }
    if let Some(dir) = &user.data_dir {
        return dir.clone();
    }
    project_root.join(PROJECT_DIR)
}
