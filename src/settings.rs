use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::caption::RenderSettings;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, Clone)]
pub struct Settings {
    pub render: RenderSettings,
    pub font_path: Option<String>,
    pub font_family: Option<String>,
    pub server_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render: RenderSettings::default(),
            font_path: None,
            font_family: None,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    caption: Option<CaptionSettings>,
    server: Option<ServerSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct CaptionSettings {
    content_font_size: Option<i64>,
    number_font_size: Option<i64>,
    number_content_spacing: Option<i64>,
    line_spacing: Option<i64>,
    font_path: Option<String>,
    font_family: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    addr: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            settings.merge_toml(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
        }
    }

    Ok(settings)
}

impl Settings {
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let parsed: SettingsFile = toml::from_str(content)?;
        self.merge(parsed);
        Ok(())
    }

    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(caption) = incoming.caption {
            merge_pixels(&mut self.render.content_font_size, caption.content_font_size, 1);
            merge_pixels(&mut self.render.number_font_size, caption.number_font_size, 1);
            merge_pixels(
                &mut self.render.number_content_spacing,
                caption.number_content_spacing,
                0,
            );
            merge_pixels(&mut self.render.line_spacing, caption.line_spacing, 1);
            if let Some(path) = caption.font_path {
                if !path.trim().is_empty() {
                    self.font_path = Some(path);
                }
            }
            if let Some(family) = caption.font_family {
                if !family.trim().is_empty() {
                    self.font_family = Some(family);
                }
            }
        }
        if let Some(server) = incoming.server {
            if let Some(addr) = server.addr {
                if !addr.trim().is_empty() {
                    self.server_addr = addr.trim().to_string();
                }
            }
        }
    }
}

fn merge_pixels(target: &mut u32, incoming: Option<i64>, min: u32) {
    if let Some(value) = incoming.and_then(|value| u32::try_from(value).ok()) {
        if value >= min {
            *target = value;
        }
    }
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".verse-caption-renderer"))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::with_temp_home;

    #[test]
    fn embedded_defaults_match_builtin_defaults() {
        let mut settings = Settings::default();
        settings.merge_toml(DEFAULT_SETTINGS_TOML).expect("parse");
        assert_eq!(settings.render, RenderSettings::default());
        assert_eq!(settings.server_addr, DEFAULT_SERVER_ADDR);
        assert_eq!(settings.font_path, None);
    }

    #[test]
    fn invalid_values_are_ignored_on_merge() {
        let mut settings = Settings::default();
        settings
            .merge_toml(
                r#"
[caption]
content_font_size = 0
number_font_size = -5
number_content_spacing = 0
line_spacing = 80
font_family = "  "
"#,
            )
            .expect("parse");
        assert_eq!(settings.render.content_font_size, 62);
        assert_eq!(settings.render.number_font_size, 41);
        assert_eq!(settings.render.number_content_spacing, 0);
        assert_eq!(settings.render.line_spacing, 80);
        assert_eq!(settings.font_family, None);
    }

    #[test]
    fn load_writes_home_file_and_applies_extra_path() {
        with_temp_home(|home| {
            let extra = home.join("extra.toml");
            fs::write(
                &extra,
                "[caption]\ncontent_font_size = 48\nfont_family = \"NanumGothic\"\n[server]\naddr = \"0.0.0.0:9000\"\n",
            )
            .expect("write extra");
            let settings = load_settings(Some(&extra)).expect("load");
            assert!(home.join(".verse-caption-renderer").join("settings.toml").exists());
            assert_eq!(settings.render.content_font_size, 48);
            assert_eq!(settings.font_family.as_deref(), Some("NanumGothic"));
            assert_eq!(settings.server_addr, "0.0.0.0:9000");
        });
    }

    #[test]
    fn missing_extra_path_is_an_error() {
        with_temp_home(|home| {
            let err = load_settings(Some(&home.join("nope.toml"))).unwrap_err();
            assert!(err.to_string().contains("settings file not found"));
        });
    }
}
