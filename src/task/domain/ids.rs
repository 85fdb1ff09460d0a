//! Identifier types for the task domain.
//!
//! Every record kind gets its own UUID newtype so identifiers cannot be mixed
//! up across collections.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a site task.
    TaskId
);

uuid_identifier!(
    /// Identifier of a construction site owned by the site collaborator.
    SiteId
);

uuid_identifier!(
    /// Unique identifier for a recorded progress update.
    TaskUpdateId
);

uuid_identifier!(
    /// Unique identifier for a per-level approval record.
    TaskApprovalId
);

uuid_identifier!(
    /// Identifier of an invoice owned by the finance collaborator.
    InvoiceId
);

uuid_identifier!(
    /// Unique identifier for a task-to-invoice link.
    TaskInvoiceLinkId
);

uuid_identifier!(
    /// Identifier of an employee (executor, supervisor or approver).
    EmployeeId
);

/// Kinds of record handled by the workflow, used in lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A site task.
    Task,
    /// A progress update.
    TaskUpdate,
    /// A per-level approval.
    TaskApproval,
    /// A task-to-invoice link.
    TaskInvoiceLink,
    /// An invoice.
    Invoice,
    /// A construction site.
    Site,
}

impl EntityKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::TaskUpdate => "task_update",
            Self::TaskApproval => "task_approval",
            Self::TaskInvoiceLink => "task_invoice_link",
            Self::Invoice => "invoice",
            Self::Site => "site",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
