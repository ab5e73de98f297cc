//! Description source adapters.
//!
//! - `FileDescriptionSource` - local file read with `tokio::fs`
//! - `HttpDescriptionSource` - HTTP GET with `reqwest`

mod file_source;
mod http_source;

pub use file_source::FileDescriptionSource;
pub use http_source::HttpDescriptionSource;

use std::sync::Arc;

use crate::domain::description::DescriptionError;
use crate::ports::DescriptionSource;

/// Picks a source for `location`: `http(s)://` URLs are fetched, anything
/// else is read as a file path.
pub fn source_for(location: &str) -> Result<Arc<dyn DescriptionSource>, DescriptionError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpDescriptionSource::new(location)?))
    } else {
        Ok(Arc::new(FileDescriptionSource::new(location)))
    }
}
