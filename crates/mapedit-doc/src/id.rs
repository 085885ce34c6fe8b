//! Strongly-typed document identifiers.

use std::fmt;

/// Index of a layer in the document's layer list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

/// Index of a group in the document's group list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

/// Index of an envelope in the document's envelope list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvelopeId(pub u32);

macro_rules! index_id {
    ($name:ident) => {
        impl $name {
            /// The id as a list index.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }
    };
}

index_id!(LayerId);
index_id!(GroupId);
index_id!(EnvelopeId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_index() {
        let id = LayerId::from(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(id.index(), 7);
        assert!(GroupId(1) < GroupId(2));
    }
}
