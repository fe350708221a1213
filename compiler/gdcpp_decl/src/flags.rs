//! Qualifier and provenance flags reported by the front end.

use bitflags::bitflags;

bitflags! {
    /// Per-declaration facts the front end reports alongside kind and spelling.
    #[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
    pub struct DeclFlags: u16 {
        /// A full definition was observed (records), as opposed to a forward declaration.
        const DEFINITION = 1 << 0;
        /// `static` member function.
        const STATIC = 1 << 1;
        /// `const`-qualified member function.
        const CONST = 1 << 2;
        /// `= delete`.
        const DELETED = 1 << 3;
        /// Record with at least one pure virtual member.
        const ABSTRACT = 1 << 4;
        /// Declared in a file pulled in by `#include`, not in the parsed header itself.
        const INCLUDED = 1 << 5;
    }
}
