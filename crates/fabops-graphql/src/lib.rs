//! fabops-graphql - Authenticated GraphQL client and bulk operations.
//!
//! The client obtains a bearer token once per process via the OAuth2
//! client-credentials grant and attaches it to every GraphQL request. On top
//! of it sit the lookup helpers (human key -> platform id), the generic
//! failure-isolating batch driver, and the per-domain operations.

mod batch;
mod client;
mod lookup;
pub mod ops;
pub mod queries;

pub use batch::run_batch;
pub use client::GraphqlClient;
pub use lookup::{
    Label, find_or_create_label, find_or_create_role, permission_group_id_by_name,
    role_id_by_name, team_id_by_name, user_id_by_email,
};
