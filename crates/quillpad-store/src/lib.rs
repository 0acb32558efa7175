pub mod connect;
pub mod convert;
pub mod entity;
pub mod error;
pub mod load;
pub mod schema;

pub use connect::{connect, connect_in_memory};
pub use error::StoreError;
pub use schema::{SchemaStatement, bootstrap, schema_statements};

pub use sea_orm;
