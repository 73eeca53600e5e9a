use chrono::{FixedOffset, Offset, Utc};
use ranked_forms::export::DEFAULT_TIMESTAMP_FORMAT;

use crate::forms::io_json::read_json;
use crate::forms::*;

pub const DEFAULT_DATA_DIRECTORY: &str = "data";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = ".";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(rename = "timestampFormat")]
    pub timestamp_format: Option<String>,
    /// Minutes east of UTC, or a string like `+02:00`.
    #[serde(rename = "utcOffset")]
    _utc_offset: Option<JSValue>,
}

impl ExportConfig {
    pub fn utc_offset(&self) -> FormsResult<FixedOffset> {
        match &self._utc_offset {
            None => Ok(Utc.fix()),
            Some(JSValue::Number(n)) => n
                .as_i64()
                .and_then(|minutes| minutes.checked_mul(60))
                .and_then(|seconds| i32::try_from(seconds).ok())
                .and_then(FixedOffset::east_opt)
                .context(InvalidConfigSnafu {
                    message: format!("utcOffset {} is out of range", n),
                }),
            Some(JSValue::String(s)) => parse_offset(s).context(InvalidConfigSnafu {
                message: format!("cannot understand utcOffset {:?}", s),
            }),
            Some(x) => InvalidConfigSnafu {
                message: format!("cannot understand utcOffset {}", x),
            }
            .fail(),
        }
    }
}

// Accepts `Z`, `UTC`, `+HH:MM`, `-HH:MM` and `+HHMM`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s == "Z" || s.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }
    let (sign, rest) = match s.chars().next()? {
        '+' => (1, &s[1..]),
        '-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormsConfig {
    #[serde(rename = "dataDirectory")]
    pub data_directory: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "exportSettings")]
    pub export_settings: Option<ExportConfig>,
}

/// A configuration file and the directory it was read from. The relative paths of the
/// configuration are resolved against that directory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConfigFile {
    pub root: PathBuf,
    pub config: FormsConfig,
}

pub fn read_config(path: &str) -> FormsResult<ConfigFile> {
    info!("Attempting to read configuration {:?}", path);
    let p = Path::new(path);
    let config: FormsConfig = read_json(p)?;
    debug!("read_config: {:?}", config);
    let root = p
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(ConfigFile { root, config })
}

/// The settings in effect for one run of the program.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub export: ExportSettings,
}

/// The command line takes precedence over the configuration file, which takes
/// precedence over the defaults.
pub fn resolve_settings(data_dir_arg: Option<&str>, config_file: Option<&ConfigFile>) -> FormsResult<Settings> {
    let from_config = |f: fn(&FormsConfig) -> Option<&String>| -> Option<PathBuf> {
        config_file.and_then(|cf| f(&cf.config).map(|s| cf.root.join(s)))
    };

    let data_dir = match data_dir_arg {
        Some(d) => PathBuf::from(d),
        None => from_config(|c| c.data_directory.as_ref())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIRECTORY)),
    };
    let output_dir = from_config(|c| c.output_directory.as_ref())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIRECTORY));

    let export_config = config_file
        .and_then(|cf| cf.config.export_settings.clone())
        .unwrap_or_default();
    let timestamp_format = export_config
        .timestamp_format
        .clone()
        .unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.to_string());
    let export = ExportSettings::new(&timestamp_format, export_config.utc_offset()?)
        .context(InvalidFormSnafu {})?;

    Ok(Settings {
        data_dir,
        output_dir,
        export,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(js: &str) -> ConfigFile {
        ConfigFile {
            root: PathBuf::from("/srv/forms"),
            config: serde_json::from_str(js).unwrap(),
        }
    }

    #[test]
    fn defaults() {
        let s = resolve_settings(None, None).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.output_dir, PathBuf::from("."));
        assert_eq!(s.export, ExportSettings::default());
    }

    #[test]
    fn command_line_wins_over_config() {
        let cf = config(r#"{"dataDirectory": "store", "outputDirectory": "exports"}"#);
        let s = resolve_settings(None, Some(&cf)).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/srv/forms/store"));
        assert_eq!(s.output_dir, PathBuf::from("/srv/forms/exports"));

        let s = resolve_settings(Some("elsewhere"), Some(&cf)).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn export_settings() {
        let cf = config(r#"{"exportSettings": {"timestampFormat": "%Y-%m-%d", "utcOffset": 120}}"#);
        let s = resolve_settings(None, Some(&cf)).unwrap();
        assert_eq!(s.export.timestamp_format(), "%Y-%m-%d");
        assert_eq!(s.export.utc_offset().local_minus_utc(), 7200);

        let cf = config(r#"{"exportSettings": {"utcOffset": "-05:30"}}"#);
        let s = resolve_settings(None, Some(&cf)).unwrap();
        assert_eq!(s.export.utc_offset().local_minus_utc(), -(5 * 3600 + 30 * 60));

        for bad in [
            r#"{"exportSettings": {"utcOffset": "noon"}}"#,
            r#"{"exportSettings": {"utcOffset": 100000}}"#,
            r#"{"exportSettings": {"utcOffset": true}}"#,
        ] {
            let err = resolve_settings(None, Some(&config(bad))).unwrap_err();
            assert!(matches!(err, FormsError::InvalidConfig { .. }), "{}", bad);
        }

        let cf = config(r#"{"exportSettings": {"timestampFormat": "%Q"}}"#);
        assert!(matches!(
            resolve_settings(None, Some(&cf)),
            Err(FormsError::InvalidForm { .. })
        ));
    }
}
