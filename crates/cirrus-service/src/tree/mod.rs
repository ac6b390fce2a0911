//! Resource tree: folder hierarchy, listings, trash lifecycle.

mod listing;
mod service;

pub use listing::{Breadcrumb, FolderContents, ListedFile, ListedFolder, TrashContents};
pub use service::TreeService;
