//! Shared constants for the upload pipeline.

/// Default directory for filesystem uploads, joined to the process working
/// directory when `FILE_UPLOAD_PATH` is not set.
pub const DEFAULT_FILE_DIRECTORY: &str = "public/cgi/asset";

/// Default upload size cap in megabytes when `MAX_UPLOAD_SIZE` is not set.
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 10;
