//! Who may do what.
//!
//! Every route funnels its permission check through [`authorize`], so the
//! owner-or-admin rule lives in exactly one place.

use quillpad_core::{BlogError, Id, Principal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// The target of an action, carrying the ownership facts the rules need.
///
/// `None` owners describe a resource that does not exist yet (creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post { owner_id: Option<Id> },
    Project { owner_id: Option<Id> },
    Comment {
        author_id: Option<Id>,
        post_owner_id: Option<Id>,
    },
    Category,
    Tag,
    About { user_id: Option<Id> },
    /// A user's own account profile.
    Profile { user_id: Id },
}

impl Resource {
    fn noun(&self) -> &'static str {
        match self {
            Resource::Post { .. } => "posts",
            Resource::Project { .. } => "projects",
            Resource::Comment { .. } => "comments",
            Resource::Category => "categories",
            Resource::Tag => "tags",
            Resource::About { .. } => "about page",
            Resource::Profile { .. } => "profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No principal, or an anonymous one, attempted a protected action.
    Unauthorized,
    /// Authenticated, but the rules do not grant this action.
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial, String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), BlogError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::Unauthorized, reason) => Err(BlogError::Unauthorized(reason)),
            Decision::Deny(Denial::Forbidden, reason) => Err(BlogError::Forbidden(reason)),
        }
    }
}

pub fn authorize(principal: &Principal, action: Action, resource: &Resource) -> Decision {
    if action == Action::Read {
        return Decision::Allow;
    }

    let Some(user) = principal.user() else {
        return Decision::Deny(Denial::Unauthorized, "Unauthorized".into());
    };

    let allowed = match (resource, action) {
        (_, Action::Read) => true,
        (Resource::About { .. }, _) => user.is_admin(),
        (Resource::Profile { user_id }, _) => user.id == *user_id,
        (_, Action::Create) => true,
        (Resource::Category | Resource::Tag, _) => true,
        (Resource::Post { owner_id } | Resource::Project { owner_id }, _) => {
            user.is_admin() || *owner_id == Some(user.id)
        }
        (
            Resource::Comment {
                author_id,
                post_owner_id,
            },
            Action::Delete,
        ) => user.is_admin() || *author_id == Some(user.id) || *post_owner_id == Some(user.id),
        (Resource::Comment { author_id, .. }, _) => {
            user.is_admin() || *author_id == Some(user.id)
        }
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(Denial::Forbidden, forbidden_reason(action, resource))
    }
}

/// [`authorize`] folded into a `Result`.
pub fn require(principal: &Principal, action: Action, resource: &Resource) -> Result<(), BlogError> {
    authorize(principal, action, resource).into_result()
}

fn forbidden_reason(action: Action, resource: &Resource) -> String {
    match resource {
        Resource::About { .. } => "Permission denied: View only mode".into(),
        Resource::Profile { .. } => "Forbidden: You can only update your own profile".into(),
        _ => {
            let verb = match action {
                Action::Delete => "delete",
                _ => "edit",
            };
            format!("Forbidden: You can only {verb} your own {}", resource.noun())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillpad_core::{AuthUser, Role};
    use rstest::rstest;

    const ALICE: Id = 1;
    const BOB: Id = 2;
    const ROOT: Id = 99;

    fn user(id: Id) -> Principal {
        Principal::User(AuthUser {
            id,
            username: format!("user{id}"),
            role: Role::User,
        })
    }

    fn admin() -> Principal {
        Principal::User(AuthUser {
            id: ROOT,
            username: "root".into(),
            role: Role::Admin,
        })
    }

    fn post_of(owner: Id) -> Resource {
        Resource::Post {
            owner_id: Some(owner),
        }
    }

    #[rstest]
    #[case(Resource::Post { owner_id: Some(ALICE) })]
    #[case(Resource::Project { owner_id: Some(ALICE) })]
    #[case(Resource::Comment { author_id: None, post_owner_id: Some(ALICE) })]
    #[case(Resource::Category)]
    #[case(Resource::Tag)]
    #[case(Resource::About { user_id: Some(ALICE) })]
    fn reads_are_public(#[case] resource: Resource) {
        assert!(authorize(&Principal::Anonymous, Action::Read, &resource).is_allowed());
    }

    #[rstest]
    #[case(Resource::Post { owner_id: None })]
    #[case(Resource::Project { owner_id: None })]
    #[case(Resource::Comment { author_id: None, post_owner_id: Some(BOB) })]
    #[case(Resource::Category)]
    #[case(Resource::Tag)]
    fn creation_needs_authentication(#[case] resource: Resource) {
        let anon = authorize(&Principal::Anonymous, Action::Create, &resource);
        assert_eq!(anon, Decision::Deny(Denial::Unauthorized, "Unauthorized".into()));
        assert!(authorize(&user(ALICE), Action::Create, &resource).is_allowed());
    }

    #[rstest]
    #[case(Action::Update)]
    #[case(Action::Delete)]
    fn owner_or_admin_for_posts(#[case] action: Action) {
        let post = post_of(ALICE);
        assert!(authorize(&user(ALICE), action, &post).is_allowed());
        assert!(authorize(&admin(), action, &post).is_allowed());

        let denied = authorize(&user(BOB), action, &post);
        assert!(matches!(denied, Decision::Deny(Denial::Forbidden, _)));
        assert!(matches!(
            authorize(&Principal::Anonymous, action, &post),
            Decision::Deny(Denial::Unauthorized, _)
        ));
    }

    #[test]
    fn owner_or_admin_for_projects() {
        let project = Resource::Project {
            owner_id: Some(BOB),
        };
        assert!(authorize(&user(BOB), Action::Update, &project).is_allowed());
        assert!(!authorize(&user(ALICE), Action::Delete, &project).is_allowed());
        assert!(authorize(&admin(), Action::Delete, &project).is_allowed());
    }

    #[test]
    fn forbidden_reason_names_the_resource() {
        let err = require(&user(BOB), Action::Update, &post_of(ALICE)).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: You can only edit your own posts");

        let err = require(&user(BOB), Action::Delete, &post_of(ALICE)).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: You can only delete your own posts");
    }

    #[test]
    fn comment_delete_grants_author_post_owner_and_admin() {
        let comment = Resource::Comment {
            author_id: Some(BOB),
            post_owner_id: Some(ALICE),
        };
        assert!(authorize(&user(BOB), Action::Delete, &comment).is_allowed());
        assert!(authorize(&user(ALICE), Action::Delete, &comment).is_allowed());
        assert!(authorize(&admin(), Action::Delete, &comment).is_allowed());
        assert!(!authorize(&user(3), Action::Delete, &comment).is_allowed());
    }

    #[test]
    fn post_owner_cannot_edit_someone_elses_comment() {
        let comment = Resource::Comment {
            author_id: Some(BOB),
            post_owner_id: Some(ALICE),
        };
        assert!(!authorize(&user(ALICE), Action::Update, &comment).is_allowed());
    }

    #[rstest]
    #[case(Action::Update)]
    #[case(Action::Delete)]
    fn taxonomy_is_shared(#[case] action: Action) {
        assert!(authorize(&user(BOB), action, &Resource::Category).is_allowed());
        assert!(authorize(&user(ALICE), action, &Resource::Tag).is_allowed());
    }

    #[test]
    fn about_is_admin_only_even_for_its_owner() {
        let own = Resource::About {
            user_id: Some(ALICE),
        };
        let decision = authorize(&user(ALICE), Action::Update, &own);
        assert_eq!(
            decision,
            Decision::Deny(Denial::Forbidden, "Permission denied: View only mode".into())
        );
        assert!(authorize(&admin(), Action::Update, &own).is_allowed());
        assert!(!authorize(&user(ALICE), Action::Create, &own).is_allowed());
    }

    #[test]
    fn profile_is_self_only() {
        let profile = Resource::Profile { user_id: ALICE };
        assert!(authorize(&user(ALICE), Action::Update, &profile).is_allowed());
        assert!(!authorize(&user(BOB), Action::Update, &profile).is_allowed());
    }

    #[test]
    fn decision_maps_to_error_kinds() {
        use quillpad_core::ErrorKind;

        let err = require(&Principal::Anonymous, Action::Create, &Resource::Tag).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = require(&user(BOB), Action::Delete, &post_of(ALICE)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}
