use crate::api::middleware::error::{ApiError, ApiResult};
use crate::models::PresentationFile;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use tokio::fs;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Filesystem-backed store for presentation files and their converted slide
/// images. Presentations live flat in one directory; slides live under
/// `<slides dir>/<presentation stem>/`.
#[derive(Clone)]
pub struct SlideStore {
    presentations_dir: PathBuf,
    slides_dir: PathBuf,
}

impl SlideStore {
    pub fn new(presentations_dir: impl Into<PathBuf>, slides_dir: impl Into<PathBuf>) -> Self {
        Self {
            presentations_dir: presentations_dir.into(),
            slides_dir: slides_dir.into(),
        }
    }

    pub async fn ensure_dirs(&self) -> ApiResult<()> {
        for dir in [&self.presentations_dir, &self.slides_dir] {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| ApiError::Internal(format!("Failed to create directory: {}", e)))?;
        }
        Ok(())
    }

    /// Regular files in the presentations directory, sorted by name.
    pub async fn list_presentations(&self) -> ApiResult<Vec<PresentationFile>> {
        let mut entries = fs::read_dir(&self.presentations_dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read presentations: {}", e)))?;

        let mut presentations = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read presentations: {}", e)))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| ApiError::Internal(format!("Failed to stat presentation: {}", e)))?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            presentations.push(PresentationFile {
                name,
                size_bytes: metadata.len(),
            });
        }

        presentations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(presentations)
    }

    /// Converted slide images for a presentation file, in display order.
    /// Returns an empty list when the presentation has not been converted.
    pub async fn list_slides(&self, filename: &str) -> ApiResult<Vec<String>> {
        sanitize_component(filename)?;
        let folder = presentation_folder(filename)?;
        let dir = self.slides_dir.join(&folder);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ApiError::Internal(format!("Failed to read slides: {}", e))),
        };

        let mut slides = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read slides: {}", e)))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_image = Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if is_image {
                slides.push(name);
            }
        }

        // Natural order so slide-2 precedes slide-10.
        slides.sort_by(|a, b| natural_cmp(a, b));
        Ok(slides)
    }

    /// Raw bytes of one slide image plus its content type.
    pub async fn read_slide(&self, folder: &str, file: &str) -> ApiResult<(Vec<u8>, &'static str)> {
        sanitize_component(folder)?;
        sanitize_component(file)?;

        let path = self.slides_dir.join(folder).join(file);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApiError::NotFound(format!(
                    "Slide not found: {}/{}",
                    folder, file
                )))
            }
            Err(e) => return Err(ApiError::Internal(format!("Failed to read slide: {}", e))),
        };

        Ok((bytes, content_type_for(file)))
    }
}

/// Slides for `training.pptx` live under the `training` folder.
pub fn presentation_folder(filename: &str) -> ApiResult<String> {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ApiError::BadRequest("Invalid presentation filename".to_string()))?;
    Ok(stem.to_string())
}

/// Reject names that could escape the configured roots.
fn sanitize_component(value: &str) -> ApiResult<()> {
    if value.is_empty()
        || value.contains('/')
        || value.contains('\\')
        || value.contains("..")
        || value.starts_with('.')
    {
        return Err(ApiError::BadRequest("Invalid path component".to_string()));
    }
    Ok(())
}

fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Compare strings so embedded numbers sort numerically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let nx = take_number(&mut left);
                    let ny = take_number(&mut right);
                    match nx.cmp(&ny) {
                        Ordering::Equal => {}
                        other => return other,
                    }
                } else {
                    match x.cmp(&y) {
                        Ordering::Equal => {
                            left.next();
                            right.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(iter: &mut Peekable<Chars>) -> u64 {
    let mut value: u64 = 0;
    while let Some(c) = iter.peek() {
        match c.to_digit(10) {
            Some(d) => {
                value = value.saturating_mul(10).saturating_add(d as u64);
                iter.next();
            }
            None => break,
        }
    }
    value
}
