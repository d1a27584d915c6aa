//! # score_helm
//!
//! Conversion of Score workloads into Helm values for score-helm.
//!
//! The conversion is a pure function of the workload and the imported
//! resource values. It builds a [`ReferenceContext`] once, then maps every
//! workload element onto the Helm values layout, resolving `${...}`
//! placeholders in environment variables and volume sources.
//!
//! ## Example
//!
//! ```rust,no_run
//! use score_helm::{convert, ValuesWriter};
//! use score_spec::SpecReader;
//!
//! let document = SpecReader::read_document("score.yaml").unwrap();
//! let workload = SpecReader::decode_workload(document).unwrap();
//! let imported = SpecReader::read_values("values.yaml").unwrap();
//!
//! let values = convert(&workload, &imported).unwrap();
//! ValuesWriter::write_yaml(std::io::stdout(), &values).unwrap();
//! ```

pub mod context;
pub mod convert;
pub mod error;
pub mod values;
pub mod writer;

pub use context::{render_scalar, Expansion, ReferenceContext};
pub use convert::convert;
pub use error::{ContextError, HelmError, HelmResult};
pub use values::{
    ContainerValues, EnvVarValues, HelmValues, ImageValues, PortValues, ProbeValues,
    QuantityValues, ResourcesValues, ServiceValues, VolumeMountValues,
};
pub use writer::ValuesWriter;
