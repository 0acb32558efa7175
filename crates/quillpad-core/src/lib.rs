pub mod error;
pub mod model;
pub mod principal;

pub use error::{BlogError, ErrorKind, FieldErrors};
pub use model::{
    About, AboutOwner, AboutPage, AuthorSummary, Category, Comment, Counted, Page, Post,
    PostDetail, PostStatus, PostType, Project, ProjectDetail, ProjectType, Role, Tag,
    UnknownVariant, UserProfile,
};
pub use principal::{AuthUser, Principal};

/// Row identifier used by every table.
pub type Id = i32;
