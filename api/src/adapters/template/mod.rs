//! Declarative transformations
//!
//! Operators describe each feed's transformation as string templates with
//! JSON-pointer placeholders, loaded from a YAML file.

pub mod template;
pub mod transform;

pub use template::Template;
pub use transform::YamlTransformSource;
