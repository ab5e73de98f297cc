//! Local file description source.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use crate::domain::description::DescriptionError;
use crate::ports::DescriptionSource;

/// Reads the description from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileDescriptionSource {
    path: PathBuf,
    location: String,
}

impl FileDescriptionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl DescriptionSource for FileDescriptionSource {
    async fn fetch(&self) -> Result<String, DescriptionError> {
        fs::read_to_string(&self.path).await.map_err(|e| {
            DescriptionError::Unavailable(format!("Failed to read {}: {}", self.location, e))
        })
    }

    fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn reads_whole_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"services\": {{}}}}").unwrap();

        let source = FileDescriptionSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap(), "{\"services\": {}}");
    }

    #[tokio::test]
    async fn rereads_after_replacement() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "v1").unwrap();
        let source = FileDescriptionSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap(), "v1");

        std::fs::write(file.path(), "v2").unwrap();
        assert_eq!(source.fetch().await.unwrap(), "v2");
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileDescriptionSource::new(dir.path().join("absent.json"));

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DescriptionError::Unavailable(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn location_is_the_path() {
        let source = FileDescriptionSource::new("/srv/starbot/description.txt");
        assert_eq!(source.location(), "/srv/starbot/description.txt");
    }
}
