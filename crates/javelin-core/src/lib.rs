//! Core types for the javelin interpreter.
//!
//! This crate holds the leaf vocabulary shared by every other crate in the
//! workspace: source spans, binary class names, the primitive/wrapper type
//! universe, runtime values, semantic types, the evaluation-semantics
//! library, the error hierarchy, and the host-metadata seam.
//!
//! ## Modules
//!
//! - [`span`]: source location tracking
//! - [`name`]: binary class names (`pkg.Outer$Inner`)
//! - [`level`]: per-session language level selection
//! - [`primitive`]: primitive kinds, wrapper kinds, and the wrapper table
//! - [`value`]: runtime values of the primitive universe
//! - [`ty`]: semantic types
//! - [`ops`]: evaluation semantics for primitive operators
//! - [`error`]: phase error hierarchy
//! - [`host`]: reflective metadata seam and the built-in host image
//! - [`modifiers`]: declaration modifier flags

pub mod error;
pub mod host;
pub mod level;
pub mod modifiers;
pub mod name;
pub mod ops;
pub mod primitive;
pub mod span;
pub mod ty;
pub mod value;

pub use error::{CheckError, CompileError, Feature, JavelinError, ParseError};
pub use host::{HostClassDesc, HostClasses, HostField, HostImage, HostMethod};
pub use level::LanguageLevel;
pub use modifiers::ClassModifiers;
pub use name::ClassName;
pub use primitive::{PrimitiveKind, WRAPPER_TABLE, WrapperKind, WrapperSpec};
pub use span::Span;
pub use ty::Type;
pub use value::Value;
