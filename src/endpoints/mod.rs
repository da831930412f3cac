//! One client per service resource family.
//!
//! Every endpoint follows the same template. Inputs are validated locally
//! first, and nothing goes on the wire when a precondition fails. The
//! operation then builds its sub-path and URL-encoded query, picks the
//! verb (`PUT` creates, `POST` updates or executes, `GET` reads, `DELETE`
//! removes), runs the exchange through
//! [`RestClient`](crate::client::RestClient) and maps the status code onto
//! the family's action result: `200`/`201` accept creations and reads,
//! `204` accepts updates and deletes (file deletion additionally requires
//! the `SmartCosmos-Event: FileDeleted` response header), `409` marks an
//! upload conflict, and everything else, transport failures and
//! undecodable bodies included, collapses to `Failed`. Diagnostic detail
//! stays on the `defmt` log; the returned results are deliberately coarse.

/// File management: definitions, uploads, content retrieval and deletion.
pub mod files;
/// Object management: the account's core resource records.
pub mod objects;
/// Realm availability checks and account registration.
pub mod registration;
/// Tag metadata and verification batches.
pub mod tags;
/// User management: accounts, roles and passwords.
pub mod users;

/// Capacity of an endpoint-built sub-path, query string included.
pub(crate) const MAX_SUB_PATH_LEN: usize = 448;
