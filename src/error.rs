use thiserror::Error;

/// Fixed message shown for Excel uploads.
pub const XLSX_UNSUPPORTED_MSG: &str = "Arquivos Excel não são suportados nesta versão. Use CSV.";

/// Fixed message shown for any other non-CSV upload.
pub const UNSUPPORTED_TYPE_MSG: &str = "Tipo de arquivo não suportado. Use CSV ou XLSX.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de entrada/saída: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tempo esgotado após {0}s ao carregar os dados")]
    Timeout(u64),

    #[error("Arquivo '{0}' não está em UTF-8; caracteres inválidos foram substituídos")]
    InvalidUtf8(String),

    #[error("{}", XLSX_UNSUPPORTED_MSG)]
    UnsupportedSpreadsheet,

    #[error("{}", UNSUPPORTED_TYPE_MSG)]
    UnsupportedFileType,

    #[error("Arquivo muito grande: {size} bytes (máx. {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Data inválida: {0:?}")]
    InvalidDate(String),

    #[error("Índice inválido: {0}")]
    InvalidIndex(usize),

    #[error("{0}")]
    Custom(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
