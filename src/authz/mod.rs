//! Authorization module - permission model and request guards
//!
//! Two permission tiers exist:
//! - `all`: every mutation on every resource
//! - `articles`: article creation, and update/delete of the principal's own articles
//!
//! Reads are public. Identity comes from the bearer token on each request.

mod evaluator;
mod middleware;
mod principal;

pub use evaluator::{is_allowed, Operation, Resource};
pub use middleware::{authorize, bearer_token, require_auth, require_permission};
pub use principal::{PermissionTier, Principal, UnknownTier};
