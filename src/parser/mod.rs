pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;
pub mod upload;

pub use pipeline::{parse_csv_reader, parse_csv_text};
pub use types::{CsvRecord, ParseOutput, ParseWarning};
pub use upload::{process_upload_batch, FileKind, UploadStatus, UploadedFile, UploadedFileResult};
