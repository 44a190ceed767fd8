use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Entity families tracked by the library. Used to label lookups in errors and
/// to prefix generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Book,
    Member,
    Loan,
    Reservation,
    Author,
    Publisher,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Member => "member",
            Self::Loan => "loan",
            Self::Reservation => "reservation",
            Self::Author => "author",
            Self::Publisher => "publisher",
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Book => "BOOK",
            Self::Member => "MEM",
            Self::Loan => "LOAN",
            Self::Reservation => "RES",
            Self::Author => "AUTH",
            Self::Publisher => "PUB",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

entity_id!(
    /// Caller-assigned membership number.
    MemberId
);
entity_id!(LoanId);
entity_id!(ReservationId);
entity_id!(AuthorId);
entity_id!(PublisherId);

const FIRST_SEQUENCE: u64 = 1001;

/// Hands out `PREFIX-<n>` identifiers for one entity kind. Sequences are
/// per generator, so two services never share a counter.
#[derive(Debug)]
pub struct SequentialIds {
    kind: EntityKind,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            next: AtomicU64::new(FIRST_SEQUENCE),
        }
    }

    pub fn next_id<T: From<String>>(&self) -> T {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        T::from(format!("{}-{sequence}", self.kind.prefix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_are_prefixed_and_unique() {
        let ids = SequentialIds::new(EntityKind::Loan);
        let first: LoanId = ids.next_id();
        let second: LoanId = ids.next_id();

        assert_eq!(first.as_str(), "LOAN-1001");
        assert_eq!(second.as_str(), "LOAN-1002");

        let many: HashSet<LoanId> = (0..500).map(|_| ids.next_id()).collect();
        assert_eq!(many.len(), 500);
    }

    #[test]
    fn generators_do_not_share_counters() {
        let loans = SequentialIds::new(EntityKind::Loan);
        let holds = SequentialIds::new(EntityKind::Reservation);
        let _: LoanId = loans.next_id();

        let hold: ReservationId = holds.next_id();
        assert_eq!(hold.to_string(), "RES-1001");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = MemberId::from("M-42");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"M-42\"");
    }
}
