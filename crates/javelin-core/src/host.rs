//! Reflective metadata seam.
//!
//! Already-compiled classes reach the interpreter through [`HostClasses`],
//! a lookup from binary name to class metadata. Embedders implement it over
//! whatever runtime they host; [`HostImage`] is the built-in implementation
//! carrying the `lang.*` bootstrap classes the checker and the conversion
//! tables rely on, plus `util.Collection`/`util.List` for per-element
//! iteration.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::modifiers::ClassModifiers;
use crate::name::ClassName;
use crate::primitive::{PrimitiveKind, WRAPPER_TABLE};
use crate::ty::Type;

/// A field of a host class.
#[derive(Debug, Clone, PartialEq)]
pub struct HostField {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
}

/// A method of a host class.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMethod {
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
    pub is_static: bool,
    pub varargs: bool,
}

/// Metadata for one already-compiled class or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct HostClassDesc {
    pub name: ClassName,
    pub superclass: Option<ClassName>,
    pub interfaces: Vec<ClassName>,
    pub modifiers: ClassModifiers,
    pub fields: Vec<HostField>,
    pub methods: Vec<HostMethod>,
    /// Constructor parameter lists.
    pub ctors: Vec<Vec<Type>>,
    /// Declared inner classes.
    pub inner: Vec<Rc<HostClassDesc>>,
}

impl HostClassDesc {
    /// A class with the given superclass and no members.
    pub fn new(name: ClassName, superclass: Option<ClassName>) -> Self {
        Self {
            name,
            superclass,
            interfaces: Vec::new(),
            modifiers: ClassModifiers::PUBLIC,
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            inner: Vec::new(),
        }
    }

    /// Whether this describes an interface.
    pub fn is_interface(&self) -> bool {
        self.modifiers.is_interface()
    }
}

/// Lookup of already-compiled class metadata by binary name.
pub trait HostClasses {
    /// Find the class with the given binary name.
    fn find(&self, name: &ClassName) -> Option<Rc<HostClassDesc>>;
}

/// The built-in host image.
///
/// Carries the bootstrap `lang.*` classes; embedders extend it with
/// [`HostImage::define`] before handing it to a session.
#[derive(Debug, Default)]
pub struct HostImage {
    classes: FxHashMap<ClassName, Rc<HostClassDesc>>,
}

impl HostImage {
    /// An empty image.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bootstrap image: `lang.Object`, `lang.String`, `lang.Number`,
    /// `lang.Comparable`, the eight wrapper classes, `util.Collection`,
    /// and `util.List`.
    pub fn bootstrap() -> Self {
        let mut image = Self::new();
        let object = ClassName::from_binary("lang.Object");
        let number = ClassName::from_binary("lang.Number");
        let comparable = ClassName::from_binary("lang.Comparable");
        let collection = ClassName::from_binary("util.Collection");

        image.define(HostClassDesc::new(object.clone(), None));

        let mut comparable_desc = HostClassDesc::new(comparable.clone(), None);
        comparable_desc.modifiers = ClassModifiers::PUBLIC | ClassModifiers::INTERFACE;
        comparable_desc.methods.push(HostMethod {
            name: "compareTo".into(),
            params: vec![Type::object()],
            ret: Type::Primitive(PrimitiveKind::Int),
            is_static: false,
            varargs: false,
        });
        image.define(comparable_desc);

        let mut string = HostClassDesc::new(ClassName::from_binary("lang.String"), Some(object.clone()));
        string.interfaces.push(comparable.clone());
        string.ctors.push(Vec::new());
        string.methods.push(HostMethod {
            name: "length".into(),
            params: Vec::new(),
            ret: Type::Primitive(PrimitiveKind::Int),
            is_static: false,
            varargs: false,
        });
        string.methods.push(HostMethod {
            name: "charAt".into(),
            params: vec![Type::Primitive(PrimitiveKind::Int)],
            ret: Type::Primitive(PrimitiveKind::Char),
            is_static: false,
            varargs: false,
        });
        string.methods.push(HostMethod {
            name: "concat".into(),
            params: vec![Type::string()],
            ret: Type::string(),
            is_static: false,
            varargs: false,
        });
        image.define(string);

        let mut number_desc = HostClassDesc::new(number.clone(), Some(object.clone()));
        number_desc.modifiers = ClassModifiers::PUBLIC | ClassModifiers::ABSTRACT;
        for (accessor, kind) in [
            ("intValue", PrimitiveKind::Int),
            ("longValue", PrimitiveKind::Long),
            ("floatValue", PrimitiveKind::Float),
            ("doubleValue", PrimitiveKind::Double),
        ] {
            number_desc.methods.push(HostMethod {
                name: accessor.into(),
                params: Vec::new(),
                ret: Type::Primitive(kind),
                is_static: false,
                varargs: false,
            });
        }
        image.define(number_desc);

        // Wrapper classes, one per table row. Numeric wrappers extend
        // lang.Number; each carries its one-argument constructor and its
        // no-argument unboxing accessor.
        for spec in &WRAPPER_TABLE {
            let name = ClassName::from_binary(spec.class_name);
            let superclass = if spec.primitive.is_numeric() && spec.primitive != PrimitiveKind::Char
            {
                number.clone()
            } else {
                object.clone()
            };
            let mut desc = HostClassDesc::new(name, Some(superclass));
            desc.interfaces.push(comparable.clone());
            desc.modifiers = ClassModifiers::PUBLIC | ClassModifiers::FINAL;
            desc.ctors.push(vec![Type::Primitive(spec.primitive)]);
            desc.methods.push(HostMethod {
                name: spec.accessor.into(),
                params: Vec::new(),
                ret: Type::Primitive(spec.primitive),
                is_static: false,
                varargs: false,
            });
            if spec.primitive == PrimitiveKind::Int {
                for bound in ["MAX_VALUE", "MIN_VALUE"] {
                    desc.fields.push(HostField {
                        name: bound.into(),
                        ty: Type::Primitive(PrimitiveKind::Int),
                        is_static: true,
                    });
                }
            }
            image.define(desc);
        }

        let mut collection_desc = HostClassDesc::new(collection.clone(), None);
        collection_desc.modifiers = ClassModifiers::PUBLIC | ClassModifiers::INTERFACE;
        collection_desc.methods.push(HostMethod {
            name: "size".into(),
            params: Vec::new(),
            ret: Type::Primitive(PrimitiveKind::Int),
            is_static: false,
            varargs: false,
        });
        image.define(collection_desc);

        let mut list = HostClassDesc::new(ClassName::from_binary("util.List"), Some(object));
        list.interfaces.push(collection);
        list.ctors.push(Vec::new());
        list.methods.push(HostMethod {
            name: "add".into(),
            params: vec![Type::object()],
            ret: Type::Primitive(PrimitiveKind::Bool),
            is_static: false,
            varargs: false,
        });
        image.define(list);

        image
    }

    /// Install a class description, replacing any previous one of the same
    /// name. Inner descriptions become reachable through their parent.
    pub fn define(&mut self, desc: HostClassDesc) {
        let rc = Rc::new(desc);
        for inner in &rc.inner {
            self.classes.insert(inner.name.clone(), Rc::clone(inner));
        }
        self.classes.insert(rc.name.clone(), rc);
    }

    /// Number of installed classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the image is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl HostClasses for HostImage {
    fn find(&self, name: &ClassName) -> Option<Rc<HostClassDesc>> {
        self.classes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_carries_the_wrapper_classes() {
        let image = HostImage::bootstrap();
        for spec in &WRAPPER_TABLE {
            let desc = image
                .find(&ClassName::from_binary(spec.class_name))
                .expect("wrapper class missing from bootstrap image");
            assert_eq!(desc.ctors, vec![vec![Type::Primitive(spec.primitive)]]);
            assert!(desc.methods.iter().any(|m| m.name == spec.accessor));
        }
    }

    #[test]
    fn numeric_wrappers_extend_number() {
        let image = HostImage::bootstrap();
        let integer = image.find(&ClassName::from_binary("lang.Integer")).unwrap();
        assert_eq!(integer.superclass, Some(ClassName::from_binary("lang.Number")));
        let boolean = image.find(&ClassName::from_binary("lang.Boolean")).unwrap();
        assert_eq!(boolean.superclass, Some(ClassName::from_binary("lang.Object")));
        let character = image.find(&ClassName::from_binary("lang.Character")).unwrap();
        assert_eq!(
            character.superclass,
            Some(ClassName::from_binary("lang.Object"))
        );
    }

    #[test]
    fn list_reaches_collection() {
        let image = HostImage::bootstrap();
        let list = image.find(&ClassName::from_binary("util.List")).unwrap();
        assert_eq!(list.interfaces, vec![ClassName::from_binary("util.Collection")]);
    }

    #[test]
    fn define_exposes_inner_classes() {
        let mut image = HostImage::new();
        let outer_name = ClassName::from_binary("p.Outer");
        let inner = HostClassDesc::new(outer_name.inner("In"), None);
        let mut outer = HostClassDesc::new(outer_name.clone(), None);
        outer.inner.push(Rc::new(inner));
        image.define(outer);
        assert!(image.find(&ClassName::from_binary("p.Outer$In")).is_some());
    }
}
