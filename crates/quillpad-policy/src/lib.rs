pub mod access;
pub mod payload;
pub mod validate;

pub use access::{Action, Decision, Denial, Resource, authorize, require};
pub use payload::{
    AboutInput, CreateComment, CreatePost, CreateProject, LoginInput, ProfileUpdate,
    RegisterInput, TermInput, UpdatePost, UpdateProject,
};
pub use validate::{FieldShape, Kind, Payload, validate};
