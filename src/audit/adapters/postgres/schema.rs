//! Diesel schema for audit event storage.

diesel::table! {
    /// Append-only audit events.
    audit_events (id) {
        /// Event identifier.
        id -> Uuid,
        /// Insertion order, assigned by the database.
        seq -> Int8,
        /// Kind of audited record.
        #[max_length = 50]
        entity_type -> Varchar,
        /// Audited record identifier.
        entity_id -> Uuid,
        /// Actor who made the change.
        #[max_length = 255]
        actor -> Varchar,
        /// Site the audited record belongs to.
        site_id -> Nullable<Uuid>,
        /// Kind of change.
        #[max_length = 50]
        event_type -> Varchar,
        /// Full serialized event.
        document -> Jsonb,
        /// Record time.
        recorded_at -> Timestamptz,
    }
}
