//! # score_spec
//!
//! Score workload specification handling for score-helm.
//!
//! This crate owns everything that happens to a Score document before it is
//! converted:
//!
//! - **Models**: strongly typed workload, container, service and resource specs
//! - **Reading**: YAML/JSON documents and imported values files
//! - **Overrides**: deep-merged override documents and `path=value` properties
//! - **Validation**: the embedded Score JSON schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use score_spec::{apply_property, merge_overrides, SchemaValidator, SpecReader};
//!
//! let mut document = SpecReader::read_document("score.yaml").unwrap();
//! let overrides = SpecReader::read_document("overrides.score.yaml").unwrap();
//! merge_overrides(&mut document, overrides);
//! apply_property(&mut document, "containers.main.image=nginx:latest").unwrap();
//!
//! let validator = SchemaValidator::new().unwrap();
//! validator.validate(&document).into_result().unwrap();
//!
//! let workload = SpecReader::decode_workload(document).unwrap();
//! println!("{}", workload.metadata.name);
//! ```

pub mod error;
pub mod models;
pub mod overrides;
pub mod reader;
pub mod validator;

pub use error::{SpecError, SpecResult};
pub use models::*;
pub use overrides::{apply_property, merge_overrides, remove_property, set_property};
pub use reader::SpecReader;
pub use validator::{SchemaValidator, ValidationResult};
