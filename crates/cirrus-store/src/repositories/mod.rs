//! Entity repositories.

pub mod file;
pub mod folder;
pub mod grant;
pub mod session;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use grant::GrantRepository;
pub use session::UploadSessionRepository;
