pub mod init;
pub mod migrate;
pub mod schema;
pub mod seed;
pub mod serve;
pub mod sql;

pub use init::cmd_init;
pub use migrate::cmd_migrate;
pub use schema::cmd_schema;
pub use seed::cmd_seed;
pub use serve::cmd_serve;
pub use sql::{Backend, cmd_sql};
