//! Recipe pictures arrive as `data:image/<ext>;base64,<payload>` strings.
//! They are decoded and checked to be a real image before being handed to an
//! [`ImageStore`].

use std::path::PathBuf;

use base64::{Engine, engine::general_purpose::STANDARD};

pub const IMAGE_DIR: &str = "recipes/images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub ext: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    pub fn file_name(&self) -> String {
        format!("{}.{}", ulid::Ulid::new().to_string().to_lowercase(), self.ext)
    }
}

pub fn decode_data_uri(value: &str) -> foodgram_shared::Result<DecodedImage> {
    let Some((header, payload)) = value.trim().split_once(',') else {
        foodgram_shared::invalid!("image", "Image must be a base64 data URI");
    };

    let Some(ext) = header
        .strip_prefix("data:image/")
        .and_then(|rest| rest.strip_suffix(";base64"))
    else {
        foodgram_shared::invalid!("image", "Image must be a base64 data URI");
    };

    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        foodgram_shared::invalid!("image", "Unsupported image format");
    }
    let ext = ext.to_owned();

    let Ok(bytes) = STANDARD.decode(payload.trim()) else {
        foodgram_shared::invalid!("image", "Image payload is not valid base64");
    };

    if let Err(err) = ::image::load_from_memory(&bytes) {
        tracing::debug!(%err, "image rejected");
        foodgram_shared::invalid!("image", "Upload a valid image");
    }

    Ok(DecodedImage { ext, bytes })
}

/// Blob storage for recipe pictures.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Persists `bytes` under `name` and returns the reference stored on the recipe.
    async fn save(&self, name: &str, bytes: &[u8]) -> anyhow::Result<String>;
}

/// Writes pictures to `<root>/recipes/images/<name>`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> anyhow::Result<String> {
        let dir = self.root.join(IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(name), bytes).await?;

        Ok(format!("{IMAGE_DIR}/{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let mut bytes = Cursor::new(vec![]);
        ::image::RgbImage::new(1, 1)
            .write_to(&mut bytes, ::image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(png()));
        let image = decode_data_uri(&uri).unwrap();
        assert_eq!(image.ext, "png");
        assert_eq!(image.bytes, png());
        assert!(image.file_name().ends_with(".png"));
    }

    #[test]
    fn test_extension_is_kept_as_sent() {
        let uri = format!("data:image/jpeg;base64,{}", STANDARD.encode(png()));
        let image = decode_data_uri(&uri).unwrap();
        assert_eq!(image.ext, "jpeg");
        assert!(image.file_name().ends_with(".jpeg"));

        let uri = format!("data:image/svg+xml;base64,{}", STANDARD.encode(png()));
        assert!(decode_data_uri(&uri).is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        for uri in [
            "",
            "not a data uri",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png,aGVsbG8=",
            "data:image/png;base64,###",
            "data:image/png;base64,aGVsbG8=",
        ] {
            let err = decode_data_uri(uri).unwrap_err();
            assert!(
                matches!(err, foodgram_shared::Error::Field { field: "image", .. }),
                "{uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_fs_store() {
        let dir = temp_dir::TempDir::new().unwrap();
        let store = FsImageStore::new(dir.path());
        let reference = store.save("a.png", &png()).await.unwrap();
        assert_eq!(reference, "recipes/images/a.png");
        assert_eq!(
            std::fs::read(dir.path().join("recipes/images/a.png")).unwrap(),
            png()
        );
    }
}
