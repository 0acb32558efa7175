//! Table definitions. Enum-valued columns are stored as their lowercase text
//! and parsed back through the domain enums in `quillpad-core`.

pub mod about;
pub mod category;
pub mod comment;
pub mod post;
pub mod post_category;
pub mod post_tag;
pub mod project;
pub mod tag;
pub mod user;

pub mod prelude {
    pub use super::about::Entity as About;
    pub use super::category::Entity as Category;
    pub use super::comment::Entity as Comment;
    pub use super::post::Entity as Post;
    pub use super::post_category::Entity as PostCategory;
    pub use super::post_tag::Entity as PostTag;
    pub use super::project::Entity as Project;
    pub use super::tag::Entity as Tag;
    pub use super::user::Entity as User;
}
