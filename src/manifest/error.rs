use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse jar archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}
