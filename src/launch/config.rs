use super::{ConfigError, LaunchError};
use crate::manifest::detect_main_class;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class path used when neither a jar nor an explicit class path is given
pub const DEFAULT_CLASS_PATH: &str = ".";

/// Everything needed to start one guest program
///
/// Either `main_class` or `jar_path` must lead to an entry class. When a jar
/// is given it also becomes the class path, overriding `class_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// Entry class; auto-detected from the jar manifest when unset
    pub main_class: Option<String>,
    /// Jar to launch
    pub jar_path: Option<String>,
    /// Class path, defaults to `.`
    pub class_path: Option<String>,
    /// Arguments for the guest `main`
    pub args: Vec<String>,
    /// Extra `-D`/`-X` options for VM creation
    pub vm_options: Vec<String>,
}

/// Entry class and class path after applying the launch policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLaunch {
    pub main_class: String,
    pub class_path: String,
}

impl LaunchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that launches a jar with the given arguments
    pub fn for_jar(jar_path: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new().jar_path(jar_path).args(args)
    }

    /// Load a launch description from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn main_class(mut self, class: impl Into<String>) -> Self {
        self.main_class = Some(class.into());
        self
    }

    pub fn jar_path(mut self, path: impl Into<String>) -> Self {
        self.jar_path = Some(path.into());
        self
    }

    pub fn class_path(mut self, class_path: impl Into<String>) -> Self {
        self.class_path = Some(class_path.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn vm_option(mut self, option: impl Into<String>) -> Self {
        self.vm_options.push(option.into());
        self
    }

    /// Class path the VM will see
    pub fn effective_class_path(&self) -> &str {
        self.jar_path
            .as_deref()
            .or(self.class_path.as_deref())
            .unwrap_or(DEFAULT_CLASS_PATH)
    }

    /// Apply the class path and entry class policy
    ///
    /// The manifest is only consulted when a jar is set and no explicit
    /// class is. Fails before any VM work when no class can be found.
    pub fn resolve(&self) -> Result<ResolvedLaunch, LaunchError> {
        if let (Some(jar), Some(class_path)) = (&self.jar_path, &self.class_path) {
            debug!("jar {} overrides class path {}", jar, class_path);
        }

        let main_class = match (&self.main_class, &self.jar_path) {
            (Some(class), _) => Some(class.clone()),
            (None, Some(jar)) => detect_main_class(jar),
            (None, None) => None,
        };

        let main_class = main_class.ok_or(LaunchError::NoMainClass)?;

        Ok(ResolvedLaunch {
            main_class,
            class_path: self.effective_class_path().to_string(),
        })
    }
}
