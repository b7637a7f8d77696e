pub mod client;
pub mod context;
pub mod discovery;
pub mod document;
pub mod error;
pub mod integrity;
pub mod ops;
pub mod store;

pub use client::{ClusterApi, KubeClusterApi};
pub use context::{ContextConfig, ContextPattern};
pub use discovery::ScanType;
pub use document::ConfigDocument;
pub use error::{Error, Result};
pub use integrity::{InvalidContext, InvalidReason, Orphans};
pub use ops::{BatchReport, CleanReport, CleanupReport, ContextManager, Listing, MergeReport};
pub use store::KubeconfigStore;
