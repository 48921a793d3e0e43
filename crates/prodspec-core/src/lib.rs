//! Core runtime for prodspec: the layout graph, its relation linker, the TOML
//! codec, the hash-gated validation marker, and pluggable validators.

// public exports are one module level down
pub mod codec;
pub mod error;
pub mod gate;
pub mod graph;
pub mod validate;
pub mod value;

pub use error::{Error, ErrorKind};

///
/// Prelude
///
/// Domain vocabulary for builders and downstream generators.
///

pub mod prelude {
    pub use crate::{
        codec::Generator,
        gate::{Gate, ValidatedLayout},
        graph::{EntityKey, EntityRef, EntityView, Layout},
        validate::{Issues, Validators},
        value::Value,
    };
    pub use prodspec_schema::types::EntityKind;
}
