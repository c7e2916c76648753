use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::dataset::DEFAULT_INDENT;
use crate::pipeline::Options;

pub const DEFAULT_INPUT: &str = "grouped_country_paths.json";
pub const DEFAULT_OUTPUT: &str = "updated_grouped_country_paths.json";

fn default_centers() -> bool {
    true
}
fn default_indent() -> usize {
    DEFAULT_INDENT
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_centers")]
    pub centers: bool,
    #[serde(default)]
    pub names: bool,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            centers: default_centers(),
            names: false,
            indent: default_indent(),
            verbose: false,
        }
    }
}

impl FileConfig {
    /// Load the first readable config from the standard search paths
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; a missing file is an error
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: Options,
    pub indent: usize,
    pub verbose: bool,
}

/// Values given on the command line; `None` / `false` means "not given"
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub names: bool,
    pub no_centers: bool,
    pub indent: Option<usize>,
    pub verbose: bool,
}

impl RunConfig {
    /// Merge command line values over file values over built-in defaults
    pub fn resolve(overrides: Overrides, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let input = overrides
            .input
            .or(file.input)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
        let output = overrides
            .output
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let options = Options {
            centers: file.centers && !overrides.no_centers,
            names: overrides.names || file.names,
        };

        if !options.centers && !options.names {
            bail!("Nothing to do: centers are disabled and --names was not given");
        }
        if same_file(&input, &output) {
            bail!(
                "Output path must differ from input path: {}",
                input.display()
            );
        }

        Ok(Self {
            input,
            output,
            options,
            indent: overrides.indent.unwrap_or(file.indent),
            verbose: overrides.verbose || file.verbose,
        })
    }
}

/// Compare paths after resolving `.`/`..` and symlinks
///
/// A path that does not exist yet is resolved through its parent directory.
fn same_file(a: &Path, b: &Path) -> bool {
    normalize_path(a) == normalize_path(b)
}

fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("mapcenter.toml"));
    paths.push(PathBuf::from(".mapcenter.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("mapcenter").join("config.toml"));
        paths.push(config_dir.join("mapcenter.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".mapcenter.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = RunConfig::resolve(Overrides::default(), None).unwrap();

        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.options, Options::default());
        assert_eq!(config.indent, 2);
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_file_config() {
        let config: FileConfig = toml::from_str(
            r#"
            input = "in.json"
            names = true
            indent = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("in.json")));
        assert!(config.centers);
        assert!(config.names);
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<FileConfig>("radius = 10").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            input: Some(PathBuf::from("file_in.json")),
            output: Some(PathBuf::from("file_out.json")),
            indent: 4,
            ..Default::default()
        };
        let overrides = Overrides {
            output: Some(PathBuf::from("cli_out.json")),
            names: true,
            no_centers: true,
            indent: Some(0),
            ..Default::default()
        };

        let config = RunConfig::resolve(overrides, Some(file)).unwrap();

        assert_eq!(config.input, PathBuf::from("file_in.json"));
        assert_eq!(config.output, PathBuf::from("cli_out.json"));
        assert!(!config.options.centers);
        assert!(config.options.names);
        assert_eq!(config.indent, 0);
    }

    #[test]
    fn test_nothing_to_do() {
        let overrides = Overrides {
            no_centers: true,
            ..Default::default()
        };
        assert!(RunConfig::resolve(overrides, None).is_err());
    }

    #[test]
    fn test_same_input_and_output() {
        let overrides = Overrides {
            input: Some(PathBuf::from("data.json")),
            output: Some(PathBuf::from("data.json")),
            ..Default::default()
        };
        assert!(RunConfig::resolve(overrides, None).is_err());
    }

    #[test]
    fn test_same_file_through_different_spellings() {
        let overrides = Overrides {
            input: Some(PathBuf::from("./data.json")),
            output: Some(PathBuf::from("data.json")),
            ..Default::default()
        };
        assert!(RunConfig::resolve(overrides, None).is_err());

        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let input = dir.path().join("in.json");
        std::fs::write(&input, "[]").unwrap();

        let overrides = Overrides {
            input: Some(input),
            output: Some(dir.path().join("sub").join("..").join("in.json")),
            ..Default::default()
        };
        assert!(RunConfig::resolve(overrides, None).is_err());
    }

    #[test]
    fn test_distinct_files_accepted() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.json");
        std::fs::write(&input, "[]").unwrap();

        let overrides = Overrides {
            input: Some(input),
            output: Some(dir.path().join("out.json")),
            ..Default::default()
        };
        assert!(RunConfig::resolve(overrides, None).is_ok());
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapcenter.toml");
        std::fs::write(&path, "names = true\n").unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert!(config.names);

        assert!(FileConfig::from_path(&dir.path().join("missing.toml")).is_err());
    }
}
