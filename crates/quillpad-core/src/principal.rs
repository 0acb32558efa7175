use crate::Id;
use crate::model::Role;

/// An authenticated caller, as resolved from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Id,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Whoever is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User(AuthUser),
}

impl Principal {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Principal::Anonymous => None,
            Principal::User(user) => Some(user),
        }
    }

    pub fn id(&self) -> Option<Id> {
        self.user().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(AuthUser::is_admin)
    }
}

impl From<AuthUser> for Principal {
    fn from(user: AuthUser) -> Self {
        Principal::User(user)
    }
}
