//! Diesel schema for site task workflow persistence.

diesel::table! {
    /// Construction sites owned by the site collaborator.
    sites (id) {
        /// Site identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Invoices owned by the billing collaborator.
    invoices (id) {
        /// Invoice identifier.
        id -> Uuid,
        /// Owning site.
        site_id -> Uuid,
        /// Invoice number.
        #[max_length = 100]
        invoice_number -> Varchar,
        /// Total in minor units.
        total_amount -> Int8,
        /// Amount paid so far in minor units.
        paid_amount -> Int8,
    }
}

diesel::table! {
    /// Site tasks with indexed filter columns and the full record.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning site.
        site_id -> Uuid,
        /// Per-site task code.
        #[max_length = 64]
        code -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Urgency.
        #[max_length = 50]
        priority -> Varchar,
        /// Trade or phase.
        #[max_length = 50]
        category -> Varchar,
        /// Assigned executor.
        executor_id -> Nullable<Uuid>,
        /// Planned completion.
        expected_completion_date -> Nullable<Timestamptz>,
        /// Archived flag.
        archived -> Bool,
        /// Full serialized task.
        document -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only progress updates.
    task_updates (id) {
        /// Update identifier.
        id -> Uuid,
        /// Insertion order, assigned by the database.
        seq -> Int8,
        /// Owning task.
        task_id -> Uuid,
        /// Full serialized update.
        document -> Jsonb,
        /// Record time.
        recorded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-level approvals, unique per (task, level).
    task_approvals (id) {
        /// Approval identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Approval level.
        #[max_length = 50]
        level -> Varchar,
        /// Decision status.
        #[max_length = 50]
        status -> Varchar,
        /// Full serialized approval.
        document -> Jsonb,
    }
}

diesel::table! {
    /// Task-to-invoice links.
    task_invoice_links (id) {
        /// Link identifier.
        id -> Uuid,
        /// Insertion order, assigned by the database.
        seq -> Int8,
        /// Linked task.
        task_id -> Uuid,
        /// Linked invoice.
        invoice_id -> Uuid,
        /// Full serialized link.
        document -> Jsonb,
        /// Link time.
        linked_at -> Timestamptz,
    }
}

diesel::table! {
    /// Last issued task-code sequence value per site.
    task_code_sequences (site_id) {
        /// Site the counter belongs to.
        site_id -> Uuid,
        /// Last issued value.
        last_value -> Int4,
    }
}
