//! Utility helpers: JSON/YAML serializers and file output.
pub mod serialization;

pub use serialization::FileUtils;
pub use serialization::Serializer;
