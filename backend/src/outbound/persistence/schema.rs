//! Diesel table definitions for the PostgreSQL schema.
//!
//! The table is provisioned outside this service; these definitions must
//! match it exactly. `diesel print-schema --schema user_service` regenerates
//! them from a live database.

diesel::table! {
    /// User records keyed by their externally supplied UUID.
    user_service.users (user_id) {
        /// Primary key supplied by the client.
        user_id -> Uuid,
        /// User name (4 to 100 characters).
        name -> Varchar,
        /// Age in whole years (at least 1).
        age -> Int4,
    }
}
