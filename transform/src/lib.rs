pub mod error;
pub mod fence;
pub mod lists;
pub mod options;
pub mod pipeline;
pub mod sections;

pub use error::{TransformError, Warning, WarningKind};
pub use fence::FenceResolver;
pub use lists::restructure_lists;
pub use options::Options;
pub use pipeline::{BlockAnnotations, Pipeline, Transformed, annotate_code_blocks};
pub use sections::wrap_sections;
