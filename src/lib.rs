pub mod acl;
pub mod adapter;
pub mod client;
pub mod error;
pub mod models;
pub mod settings;
pub mod utils;

pub use acl::Acl;
pub use adapter::S3Adapter;
pub use client::{ObjectClient, RustS3Client};
pub use error::{AdapterError, Result, Sentinel};
pub use models::{ObjectDescriptor, ObjectEntry, ObjectMeta};
pub use settings::{set_process_defaults, PartialSettings, S3Settings};
pub use utils::safe_filename;
