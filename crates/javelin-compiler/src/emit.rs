//! The bytecode-synthesis seam.
//!
//! Turning one resolved class description into a byte sequence is the job
//! of an external collaborator behind [`ClassEmitter`]. The orchestrator
//! hands the emitted bytes straight to the class loader and never inspects
//! them. [`DescriptorEmitter`] is the built-in implementation: a
//! deterministic encoding of the resolved description, sufficient for
//! sessions that never execute emitted classes (and for tests).

use javelin_ast::TypeDecl;
use javelin_core::{ClassName, CompileError};

/// A class description with its supertype references resolved to binary
/// names, ready for emission.
#[derive(Debug)]
pub struct ResolvedClass<'c> {
    pub name: &'c ClassName,
    pub superclass: Option<&'c ClassName>,
    pub interfaces: &'c [ClassName],
    pub decl: &'c TypeDecl,
}

/// Synthesizes loadable bytes for one resolved class.
pub trait ClassEmitter {
    fn emit(&mut self, class: &ResolvedClass<'_>) -> Result<Vec<u8>, CompileError>;
}

/// Deterministic descriptor encoding of a resolved class.
#[derive(Debug, Default)]
pub struct DescriptorEmitter;

const MAGIC: &[u8; 4] = b"JVC1";

impl ClassEmitter for DescriptorEmitter {
    fn emit(&mut self, class: &ResolvedClass<'_>) -> Result<Vec<u8>, CompileError> {
        let name = class.name.binary();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        push_name(&mut bytes, &name);
        match class.superclass {
            Some(superclass) => push_name(&mut bytes, &superclass.binary()),
            None => push_name(&mut bytes, ""),
        }
        push_count(&mut bytes, &name, class.interfaces.len())?;
        for interface in class.interfaces {
            push_name(&mut bytes, &interface.binary());
        }
        push_count(&mut bytes, &name, class.decl.fields.len())?;
        push_count(&mut bytes, &name, class.decl.methods.len())?;
        push_count(&mut bytes, &name, class.decl.ctors.len())?;
        push_count(&mut bytes, &name, class.decl.inner.len())?;
        Ok(bytes)
    }
}

fn push_name(bytes: &mut Vec<u8>, name: &str) {
    bytes.extend_from_slice(name.as_bytes());
    bytes.push(0);
}

fn push_count(bytes: &mut Vec<u8>, class: &str, count: usize) -> Result<(), CompileError> {
    let count = u16::try_from(count).map_err(|_| CompileError::Emit {
        name: class.to_string(),
        detail: "member count exceeds descriptor range".into(),
    })?;
    bytes.extend_from_slice(&count.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::Span;

    #[test]
    fn emission_is_deterministic() {
        let name = ClassName::from_binary("p.Foo");
        let superclass = ClassName::from_binary("lang.Object");
        let decl = TypeDecl::class("Foo", Span::point(1, 1));
        let resolved = ResolvedClass {
            name: &name,
            superclass: Some(&superclass),
            interfaces: &[],
            decl: &decl,
        };
        let mut emitter = DescriptorEmitter;
        let first = emitter.emit(&resolved).unwrap();
        let second = emitter.emit(&resolved).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(MAGIC));
    }

    #[test]
    fn bytes_embed_the_resolved_names() {
        let name = ClassName::from_binary("p.Foo");
        let decl = TypeDecl::class("Foo", Span::point(1, 1));
        let resolved = ResolvedClass {
            name: &name,
            superclass: None,
            interfaces: &[],
            decl: &decl,
        };
        let bytes = DescriptorEmitter.emit(&resolved).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("p.Foo"));
    }
}
