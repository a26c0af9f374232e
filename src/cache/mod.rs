pub(crate) mod query;
pub(crate) mod query_cache;

pub(crate) use query::{QueryKey, QueryResult};
#[cfg(test)]
pub(crate) use query::NOTES_PER_PAGE;
pub(crate) use query_cache::{QueryCache, Spawner};
