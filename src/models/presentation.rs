use serde::Serialize;

/// A presentation file available in the configured presentations directory.
#[derive(Debug, Clone, Serialize)]
pub struct PresentationFile {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct PresentationListResponse {
    pub presentations: Vec<PresentationFile>,
    pub count: i64,
}

/// Converted slide images for one presentation, in display order.
#[derive(Debug, Serialize)]
pub struct SlideListResponse {
    pub folder: String,
    pub slides: Vec<String>,
    pub count: i64,
}
