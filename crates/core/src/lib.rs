//! swo-core: Core library for the swo Swift object CLI
//!
//! This crate provides the core functionality for swo, including:
//! - Configuration and profile management
//! - Request parsing and validation
//! - The object operations (info, list, put, copy, get, rename, delete)
//! - ObjectConnection trait the operations run against
//!
//! This crate is independent of the concrete Swift client, so the
//! operations can be tested against mocks and in-memory connections.

pub mod config;
pub mod error;
pub mod object;
pub mod profile;
pub mod request;
pub mod traits;

pub use config::{Config, ConfigManager, Defaults};
pub use error::{Error, Result};
pub use object::{
    Confirmation, MAX_OBJECT_SIZE, ObjectDetails, ObjectListing, Outcome, copy_object,
    delete_large_object, delete_object, execute, get_info, get_object, hash_source, list_objects,
    manifest_delete_url, put_object, rename_object,
};
pub use profile::{Profile, ProfileManager, TimeoutConfig};
pub use request::{
    CopyRequest, DeleteRequest, GetRequest, ListRequest, ObjectRef, ObjectRequest, PutRequest,
    RenameRequest,
};
pub use traits::{
    Endpoint, NoStatus, ObjectConnection, ObjectHeaders, ObjectInfo, ObjectStream, ObjectWriter,
    StatusSink,
};
