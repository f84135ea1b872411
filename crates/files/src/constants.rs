/// Public URL prefix under which uploaded blobs are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Media type reported when neither content nor extension identify a blob.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

pub(crate) const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];
