// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use pogen_render::ImageAssets;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TEMPLATE_PATH: &str = "template.html";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub render: Render,
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            render: Render::default(),
            assets: Assets::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Render {
    pub template_path: Option<String>,
    pub output_dir: Option<String>,
    pub open_after_generate: Option<bool>,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            template_path: Some(DEFAULT_TEMPLATE_PATH.to_owned()),
            output_dir: Some(DEFAULT_OUTPUT_DIR.to_owned()),
            open_after_generate: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assets {
    pub logo: Option<String>,
    pub stamp: Option<String>,
    pub sales_rep_stamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("POGEN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set POGEN_CONFIG_PATH to the config file")
        })?;

        Ok(config_root.join(pogen_db::APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [storage], [render], [assets], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            pogen_db::validate_db_path(db_path)?;
        }

        if let Some(template) = &self.render.template_path
            && template.trim().is_empty()
        {
            bail!("render.template_path in {} must not be empty", path.display());
        }

        if let Some(output) = &self.render.output_dir
            && output.trim().is_empty()
        {
            bail!("render.output_dir in {} must not be empty", path.display());
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => pogen_db::default_db_path(),
        }
    }

    pub fn template_path(&self) -> PathBuf {
        PathBuf::from(
            self.render
                .template_path
                .as_deref()
                .unwrap_or(DEFAULT_TEMPLATE_PATH),
        )
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.render.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    pub fn open_after_generate(&self) -> bool {
        self.render.open_after_generate.unwrap_or(true)
    }

    pub fn image_assets(&self) -> ImageAssets {
        let defaults = ImageAssets::default();
        let pick = |value: &Option<String>, fallback: PathBuf| {
            value.as_deref().map(PathBuf::from).unwrap_or(fallback)
        };
        ImageAssets {
            logo: pick(&self.assets.logo, defaults.logo),
            stamp: pick(&self.assets.stamp, defaults.stamp),
            sales_rep_stamp: pick(&self.assets.sales_rep_stamp, defaults.sales_rep_stamp),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# pogen config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is POGEN_DB_PATH or the platform data dir (for example ~/.local/share/pogen/pogen.db)\n# db_path = \"/absolute/path/to/pogen.db\"\n\n[render]\ntemplate_path = \"{DEFAULT_TEMPLATE_PATH}\"\noutput_dir = \"{DEFAULT_OUTPUT_DIR}\"\nopen_after_generate = true\n\n[assets]\n# Missing images are left out of the generated order.\nlogo = \"logo.png\"\nstamp = \"stamp.png\"\nsales_rep_stamp = \"sales_rep_stamp.png\"\n\n[log]\n# POGEN_LOG overrides this, e.g. POGEN_LOG=pogen_db=debug\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n",
            path.display(),
        )
    }
}
