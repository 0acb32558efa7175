/// Declares a closed string enum stored and transmitted in lowercase.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::model::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::model::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                        allowed: Self::VALUES.join(", "),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod about;
pub mod comment;
pub mod post;
pub mod project;
pub mod taxonomy;
pub mod user;

use serde::Serialize;
use thiserror::Error;

pub use about::{About, AboutOwner, AboutPage};
pub use comment::Comment;
pub use post::{Post, PostDetail, PostStatus, PostType};
pub use project::{Project, ProjectDetail, ProjectType};
pub use taxonomy::{Category, Counted, Tag};
pub use user::{AuthorSummary, Role, UserProfile};

/// Returned when a stored or submitted string is not one of an enum's variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of [{allowed}]")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub allowed: String,
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}
