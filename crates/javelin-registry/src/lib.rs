//! Per-session class registry.
//!
//! This crate provides [`ClassInfo`], the polymorphic description of one
//! class — tree-backed (a parsed declaration awaiting compilation) or
//! host-backed (already-compiled metadata from the reflective seam) — and
//! [`ClassPool`], the per-session store mapping binary names to
//! descriptions.
//!
//! # Storage Model
//!
//! Descriptions are stored by binary [`ClassName`] as the primary key, with
//! an insertion-order index beside the map so that "give me an arbitrary
//! still-compilable entry" is deterministic.
//!
//! # Thread Safety
//!
//! A `ClassPool` belongs to exactly one interpreter session and is only
//! touched from the session's thread. Tree-backed entries share their
//! declarations through `Rc`, so none of this is `Send`; concurrent
//! sessions each own an independent pool.
//!
//! [`ClassName`]: javelin_core::ClassName

pub mod class_info;
pub mod pool;

pub use class_info::{ClassInfo, ClassSource};
pub use pool::ClassPool;
