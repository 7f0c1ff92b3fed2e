//! Declaration modifier flags.

use bitflags::bitflags;

bitflags! {
    /// Modifiers on a class, interface, field, or method declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassModifiers: u16 {
        const PUBLIC    = 0x0001;
        const STATIC    = 0x0008;
        const FINAL     = 0x0010;
        const INTERFACE = 0x0200;
        const ABSTRACT  = 0x0400;
    }
}

impl ClassModifiers {
    /// Whether the INTERFACE flag is set.
    pub fn is_interface(self) -> bool {
        self.contains(ClassModifiers::INTERFACE)
    }

    /// Whether the STATIC flag is set.
    pub fn is_static(self) -> bool {
        self.contains(ClassModifiers::STATIC)
    }
}
