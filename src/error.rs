use reqwest::StatusCode;

pub const INVALID_EXTENSION_MESSAGE: &str = "Por favor, selecione um arquivo .stl ou .obj";
pub const NO_FILE_SELECTED_MESSAGE: &str = "Nenhum arquivo selecionado.";

const ANALYSIS_FAILED_PREFIX: &str =
    "Falha ao analisar o arquivo. Verifique se o backend está rodando e acessível. Detalhe: ";

pub trait StdErrorExt: std::error::Error + Send + Sync + 'static {}
impl<T> StdErrorExt for T where T: std::error::Error + Send + Sync + 'static {}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// the picked file is missing or does not carry an accepted extension
    #[error("{user_message}")]
    Validation { user_message: String },

    /// submit was triggered without a selected file
    #[error("{user_message}")]
    NoFileSelected { user_message: String },

    /// the service answered with a non-success status
    #[error("{detail}")]
    Service { status: StatusCode, detail: String },

    /// no usable response came back
    #[error("{detail}")]
    Transport {
        detail: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl AppError {
    pub fn invalid_extension() -> Self {
        Self::Validation {
            user_message: INVALID_EXTENSION_MESSAGE.to_string(),
        }
    }

    pub fn no_file_selected() -> Self {
        Self::NoFileSelected {
            user_message: NO_FILE_SELECTED_MESSAGE.to_string(),
        }
    }

    pub fn service(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Service {
            status,
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
            source: None,
        }
    }

    pub fn transport_with_source<E>(detail: impl Into<String>, err: E) -> Self
    where
        E: StdErrorExt,
    {
        Self::Transport {
            detail: detail.into(),
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation { .. } | AppError::NoFileSelected { .. } => ErrorKind::Validation,
            AppError::Service { .. } => ErrorKind::Service,
            AppError::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// The message shown in the error region.
    ///
    /// Local errors are shown verbatim, anything that went through the network
    /// is wrapped in the analysis failure template.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { user_message } | AppError::NoFileSelected { user_message } => {
                user_message.clone()
            }
            AppError::Service { detail, .. } | AppError::Transport { detail, .. } => {
                format!("{}{}", ANALYSIS_FAILED_PREFIX, detail)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Service,
    Transport,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Service => "service",
            Self::Transport => "transport",
        }
    }
}

/// What the error region displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AppError> for ErrorState {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Transport {
                source: Some(source),
                ..
            } => log::info!("[{}] {}: {:?}", err.kind().as_str(), err, source),
            _ => log::info!("[{}] {}", err.kind().as_str(), err),
        }

        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}
