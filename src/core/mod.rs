//! Core data types: platform keys, toolchain versions, theme values,
//! build requests and the error taxonomy.

pub mod errors;
pub mod platform;
pub mod request;
pub mod theme;
pub mod version;

pub use errors::ToolchainError;
pub use platform::{ArchiveFormat, DownloadSpec, PlatformKey, PlatformResolver};
pub use request::{BuildRequest, Invocation};
pub use theme::{ThemeMap, ThemeValue};
pub use version::{ToolchainDescriptor, ToolchainVersion};
