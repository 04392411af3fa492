use super::principal::{PermissionTier, Principal};

/// What a request wants to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Operation::Read)
    }
}

/// Target of an operation.
///
/// `author` is the stored article's current author, when it has been looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    Article { author: Option<&'a str> },
    Project,
    Link,
}

/// Decide whether `principal` may perform `op` on `resource`.
///
/// Evaluation order:
/// 1. reads -> allow, authenticated or not
/// 2. no principal -> deny
/// 3. tier `all` -> allow
/// 4. tier `articles` -> article create, or update/delete when the author matches
/// 5. deny
pub fn is_allowed(principal: Option<&Principal>, op: Operation, resource: Resource<'_>) -> bool {
    if !op.is_mutation() {
        return true;
    }

    let Some(principal) = principal else {
        return false;
    };

    let allowed = match principal.permission {
        PermissionTier::All => true,
        PermissionTier::Articles => match (op, resource) {
            (Operation::Create, Resource::Article { .. }) => true,
            (Operation::Update | Operation::Delete, Resource::Article { author }) => {
                author == Some(principal.username.as_str())
            }
            _ => false,
        },
    };

    tracing::debug!(
        user = %principal.username,
        permission = %principal.permission,
        operation = ?op,
        resource = ?resource,
        allowed,
        "authorization decision"
    );

    allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice(tier: PermissionTier) -> Principal {
        Principal::new("u1", "alice", tier)
    }

    #[test]
    fn reads_need_no_principal() {
        for resource in [Resource::Article { author: None }, Resource::Project, Resource::Link] {
            assert!(is_allowed(None, Operation::Read, resource));
        }
    }

    #[test]
    fn anonymous_mutations_are_denied() {
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert!(!is_allowed(None, op, Resource::Article { author: Some("alice") }));
            assert!(!is_allowed(None, op, Resource::Project));
            assert!(!is_allowed(None, op, Resource::Link));
        }
    }

    #[test]
    fn tier_all_is_unconditional() {
        let p = alice(PermissionTier::All);
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert!(is_allowed(Some(&p), op, Resource::Article { author: Some("bob") }));
            assert!(is_allowed(Some(&p), op, Resource::Article { author: None }));
            assert!(is_allowed(Some(&p), op, Resource::Project));
            assert!(is_allowed(Some(&p), op, Resource::Link));
        }
    }

    #[test]
    fn tier_articles_owns_only_its_articles() {
        let p = alice(PermissionTier::Articles);
        assert!(is_allowed(Some(&p), Operation::Create, Resource::Article { author: None }));
        for op in [Operation::Update, Operation::Delete] {
            assert!(is_allowed(Some(&p), op, Resource::Article { author: Some("alice") }));
            assert!(!is_allowed(Some(&p), op, Resource::Article { author: Some("bob") }));
            assert!(!is_allowed(Some(&p), op, Resource::Article { author: None }));
        }
    }

    #[test]
    fn tier_articles_cannot_touch_projects_or_links() {
        let p = alice(PermissionTier::Articles);
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert!(!is_allowed(Some(&p), op, Resource::Project));
            assert!(!is_allowed(Some(&p), op, Resource::Link));
        }
    }
}
