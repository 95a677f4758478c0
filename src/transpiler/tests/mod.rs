//! Transpiler test modules.
//!
//! Tests are organized by statement:
//! - `select`: projections, ordering, grouping, limits, display rendering
//! - `conditions`: WHERE translation of operators and functions
//! - `update`: SET assignments, counters, collections, IF conditions
//! - `delete`: DELETE options and conflicts
//! - `insert`: INSERT from entity instances
//! - `ddl`: CREATE TABLE and CREATE INDEX

mod conditions;
mod select;

use crate::mapping::{Map, MappingConfiguration, SortOrder};
use crate::query::Table;
use crate::test_fixtures::{PageViews, Person, Song};

/// `person`, partitioned by `id`.
fn people() -> Table<Person> {
    let config = MappingConfiguration::new();
    config.define(Map::<Person>::new().table_name("person").partition_key(["id"]));
    Table::new(&config).unwrap()
}

/// `songs`, partitioned by `artist`, clustered by `album` then `track` descending.
fn songs() -> Table<Song> {
    let config = MappingConfiguration::new();
    config.define(
        Map::<Song>::new()
            .table_name("songs")
            .partition_key(["artist"])
            .clustering_key([("album", SortOrder::Ascending), ("track", SortOrder::Descending)]),
    );
    Table::new(&config).unwrap()
}

/// `page_views` counter table.
fn page_views() -> Table<PageViews> {
    let config = MappingConfiguration::new();
    config.define(
        Map::<PageViews>::new()
            .table_name("page_views")
            .partition_key(["url"])
            .clustering_key([("day", SortOrder::Ascending)])
            .column("views", |c| c.as_counter()),
    );
    Table::new(&config).unwrap()
}
