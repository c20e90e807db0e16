//! Tree mutation engine: transactional create/update/delete/read over the
//! course → module → lesson → content tree.
//!
//! Every function here runs on a `&mut PgConnection` *inside* a transaction
//! opened by the calling handler; the engine issues statements top-down for
//! creates and bottom-up for deletes, and relies on transaction rollback as
//! the sole failure-atomicity mechanism. The engine never catches and
//! swallows errors and never retries.

pub mod create;
pub mod hydrate;
pub mod ordering;
pub mod teardown;
pub mod update;
