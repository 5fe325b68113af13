use crate::parser::{process_upload_batch, UploadedFile, UploadedFileResult};
use crate::state::{AppState, SessionAccess};

/// Processes a batch and returns one result per file, in input order.
/// Successfully parsed files are appended to the session's upload list;
/// they never touch the loaded read model.
pub fn upload_files(
    state: &AppState,
    files: Vec<UploadedFile>,
) -> Result<Vec<UploadedFileResult>, String> {
    state.session_mut(|s| {
        let max = s.config.max_upload_bytes;
        let uploads = &mut s.uploads;
        let results = process_upload_batch(&files, max, |ok| {
            uploads.extend_from_slice(ok);
        });
        log::info!(
            "Upload batch: {} file(s), {} kept, {} in session",
            results.len(),
            results.iter().filter(|r| r.error.is_none()).count(),
            uploads.len()
        );
        Ok(results)
    })
}

pub fn list_uploaded_files(state: &AppState) -> Result<Vec<UploadedFileResult>, String> {
    state.session(|s| Ok(s.uploads.clone()))
}

/// Removes one uploaded file by position and returns the remaining list.
pub fn remove_uploaded_file(
    state: &AppState,
    index: usize,
) -> Result<Vec<UploadedFileResult>, String> {
    state.session_mut(|s| {
        let removed = s.remove_upload(index)?;
        log::info!("Removed upload '{}'", removed.name);
        Ok(s.uploads.clone())
    })
}
