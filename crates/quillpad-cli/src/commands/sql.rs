use anyhow::Result;
use clap::ValueEnum;
use quillpad_store::schema_statements;
use quillpad_store::sea_orm::DbBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Sqlite,
    Postgres,
    Mysql,
}

impl From<Backend> for DbBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Sqlite => DbBackend::Sqlite,
            Backend::Postgres => DbBackend::Postgres,
            Backend::Mysql => DbBackend::MySql,
        }
    }
}

pub fn cmd_sql(backend: Backend) -> Result<()> {
    for statement in render(backend) {
        println!("{statement};");
    }
    Ok(())
}

fn render(backend: Backend) -> Vec<String> {
    schema_statements()
        .iter()
        .map(|s| s.build(backend.into()))
        .collect()
}
