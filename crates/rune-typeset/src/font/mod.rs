//! Font families, faces and their resolution for script runs.

pub mod data;
mod descriptor;
pub mod instance;
pub mod metrics;
pub mod registry;
pub mod script;
pub mod source;
mod types;

pub use data::{FontData, ShapingHandle, SynthesisParams};
pub use instance::{FontAdapter, FontInstance, MultiScriptAdapter, SingleScriptAdapter};
pub use metrics::{FontMetrics, ScaledFontMetrics};
pub use registry::{FaceInfo, FamilyInfo, FontRegistry, SynthesisOptions};
pub use script::{Script, ScriptSet, script_runs};
#[cfg(feature = "mmap")]
pub use source::MappedFileSource;
pub use source::{FileSource, FontBytes, FontSource, MappedFont, MemorySource, SystemFontSource};
pub use types::{
    FaceDataHandle, Font, FontFamily, FontStyle, FontVariant, FontWeight, MultiScriptFont,
    SUBSCRIPT_SHIFT, SUPERSCRIPT_SHIFT, SYNTHETIC_SCALE, SingleScriptFont, Synthesis,
};
