pub mod local;
pub mod provider;

pub use local::*;
pub use provider::*;

use std::path::Path;

/// The two independent blob areas under the storage root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobArea {
    /// Generic uploads, stored under their original file name
    Uploads,
    /// Profile images, stored under a generated name
    Profiles,
}

impl BlobArea {
    pub fn dir_name(&self) -> &'static str {
        match self {
            BlobArea::Uploads => "uploads",
            BlobArea::Profiles => "profiles",
        }
    }

    /// Public URL path prefix the area is served under
    pub fn route(&self) -> String {
        format!("/{}", self.dir_name())
    }
}

/// Storage manager holding one provider per blob area
pub struct StorageManager {
    uploads: Box<dyn StorageProvider>,
    profiles: Box<dyn StorageProvider>,
}

impl StorageManager {
    pub fn new(root: &Path) -> Self {
        Self {
            uploads: Box::new(LocalStorage::new(root.join(BlobArea::Uploads.dir_name()))),
            profiles: Box::new(LocalStorage::new(root.join(BlobArea::Profiles.dir_name()))),
        }
    }

    /// Get the storage provider for an area
    pub fn provider(&self, area: BlobArea) -> &dyn StorageProvider {
        match area {
            BlobArea::Uploads => self.uploads.as_ref(),
            BlobArea::Profiles => self.profiles.as_ref(),
        }
    }
}

/// Final path component of a client-supplied file name, accepting either
/// separator. The name is otherwise kept verbatim. `None` when nothing usable remains.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    match base {
        "" | "." | ".." => None,
        base => Some(base.to_string()),
    }
}

/// Blob name referenced by a stored file URL: the last path segment,
/// without query or fragment, percent-decoded.
pub fn blob_name_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let segment = path.rsplit('/').next().unwrap_or("");
    let decoded = urlencoding::decode(segment).ok()?;
    sanitize_file_name(&decoded)
}
