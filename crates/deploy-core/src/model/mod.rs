//! Modelos del core: direcciones, especificaciones de artifacts, registros
//! publicados y el estado de un run.

pub mod address;
pub mod artifact;
pub mod record;

pub use address::{Address, InvalidAddress};
pub use artifact::{ArtifactSpec, ConstructorArg};
pub use record::{History, LibraryBindings, PublishedRecord, RunState};
