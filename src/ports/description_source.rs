//! Description Source Port - Where the organization description is read from.

use async_trait::async_trait;

use crate::domain::description::DescriptionError;

/// Port for fetching the raw description body.
///
/// Each call reads the whole resource; parsing happens in the store.
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// Reads the full body.
    ///
    /// # Errors
    /// - `Unavailable` if the resource cannot be reached or read
    /// - `Status` if an HTTP source answers with a non-2xx status
    async fn fetch(&self) -> Result<String, DescriptionError>;

    /// Path or URL, for logging and format inference.
    fn location(&self) -> &str;
}
