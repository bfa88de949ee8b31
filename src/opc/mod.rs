/// Container access for WordprocessingML packages.
///
/// Only the handful of parts that carry comment data are ever read, so this
/// layer skips content types and relationships entirely and addresses parts
/// by their conventional member names.
///
/// - `constants`: member names and namespace URIs
/// - `container`: the [`PartSource`] seam and its ZIP and in-memory backends
pub mod constants;
pub mod container;

pub use container::{Container, MemoryContainer, PartSource};
