//! 错误处理

#[allow(unused)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // 标准库错误处理
    #[error("io error, {0}")]
    Io(std::io::Error),
    // std::sync::poison::rwlock
    #[error("lock error, {0}")]
    LockError(String),
    #[error("strum error, {0}")]
    ParseEnumString(String),

    #[error("serde json error, {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("http error, {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("decode error, {0}")]
    Decode(String),

    #[cfg(feature = "comfyui")]
    #[error("py error, {0}")]
    PyErr(#[from] pyo3::PyErr),
    #[cfg(feature = "comfyui")]
    #[error("pythonize error, {0}")]
    PythonizeError(#[from] pythonize::PythonizeError),

    #[error("image error, {0}")]
    ImageError(#[from] image::ImageError),
    #[error("creating image buffer error")]
    ImageBuffer,
    #[error("unsupported number of channels: {0}")]
    UnsupportedNumberOfChannels(u32),
    #[error("invalid tensor shape, {0}")]
    InvalidTensorShape(String),

    #[error("invalid parameter, {0}")]
    InvalidParameter(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("file already exists: {0}")]
    FileExists(String),
    #[error("security error: can only operate files in {0}")]
    PathEscape(String),

    #[error("backend error, {0}")]
    Backend(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
