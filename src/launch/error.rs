use super::VmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No main class: set one explicitly or point at a jar whose manifest declares Main-Class")]
    NoMainClass,

    #[error("Failed to create virtual machine: {0}")]
    CreateVm(#[source] VmError),

    #[error("Failed to load class {class}: {source}")]
    ClassNotFound { class: String, source: VmError },

    #[error("Class {class} has no public static void main(String[]): {source}")]
    MethodNotFound { class: String, source: VmError },

    #[error("Failed to build argument array: {0}")]
    Arguments(#[source] VmError),

    #[error("Failed to invoke {class}.main: {source}")]
    Invocation { class: String, source: VmError },

    #[error("Uncaught exception: {0}")]
    Exception(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read launch file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse launch file: {0}")]
    Parse(#[from] serde_json::Error),
}
