//! Identifiers.

use std::fmt;

use crate::tree::OpaqueValue;

/// A name as written in the source, remembering whether it was delimited
/// (`[name]` or `"name"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub delimited: bool,
}

impl Identifier {
    /// A plain identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delimited: false,
        }
    }

    /// A bracket or quote delimited identifier.
    #[must_use]
    pub fn delimited(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delimited: true,
        }
    }

    /// Joins a multi-part name with dots, re-delimiting where needed.
    #[must_use]
    pub fn join(parts: &[Self]) -> String {
        parts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl OpaqueValue for Identifier {}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.delimited {
            write!(f, "[{}]", self.name.replace(']', "]]"))
        } else {
            f.write_str(&self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Identifier::new("orders").to_string(), "orders");
        assert_eq!(Identifier::delimited("order id").to_string(), "[order id]");
        assert_eq!(Identifier::delimited("a]b").to_string(), "[a]]b]");
    }

    #[test]
    fn test_join() {
        let parts = [Identifier::new("dbo"), Identifier::delimited("Order Lines")];
        assert_eq!(Identifier::join(&parts), "dbo.[Order Lines]");
    }
}
