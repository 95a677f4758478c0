//! Entities and a recording session shared by the integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use cqlinq::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub age: i32,
}

impl Entity for User {
    fn type_name() -> &'static str {
        "User"
    }

    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("id", CqlType::Int),
            MemberInfo::new("name", CqlType::Text),
            MemberInfo::new("email", CqlType::Text),
            MemberInfo::new("age", CqlType::Int),
        ]
    }

    fn value_of(&self, member: &str) -> Option<Value> {
        match member {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "email" => Some(self.email.clone().into()),
            "age" => Some(self.age.into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Event {
    pub device: String,
    pub bucket: String,
    pub at: i64,
    pub kind: String,
    pub labels: Vec<String>,
}

impl Entity for Event {
    fn type_name() -> &'static str {
        "Event"
    }

    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("device", CqlType::Text),
            MemberInfo::new("bucket", CqlType::Text),
            MemberInfo::new("at", CqlType::BigInt),
            MemberInfo::new("kind", CqlType::Text),
            MemberInfo::new("labels", CqlType::set(CqlType::Text)),
        ]
    }

    fn value_of(&self, member: &str) -> Option<Value> {
        match member {
            "device" => Some(self.device.clone().into()),
            "bucket" => Some(self.bucket.clone().into()),
            "at" => Some(self.at.into()),
            "kind" => Some(self.kind.clone().into()),
            "labels" => Some(Value::Set(
                self.labels.iter().map(|l| l.as_str().into()).collect(),
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Hits {
    pub page: String,
    pub total: i64,
}

impl Entity for Hits {
    fn type_name() -> &'static str {
        "Hits"
    }

    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("page", CqlType::Text),
            MemberInfo::new("total", CqlType::BigInt),
        ]
    }

    fn value_of(&self, member: &str) -> Option<Value> {
        match member {
            "page" => Some(self.page.clone().into()),
            "total" => Some(self.total.into()),
            _ => None,
        }
    }
}

/// Mappings for all three entities.
pub fn configuration() -> MappingConfiguration {
    let config = MappingConfiguration::new();
    config
        .define(Map::<User>::new().table_name("users").partition_key(["id"]))
        .define(
            Map::<Event>::new()
                .table_name("events")
                .partition_key(["device", "bucket"])
                .clustering_key([("at", SortOrder::Descending)])
                .column("labels", |c| c.with_secondary_index()),
        )
        .define(
            Map::<Hits>::new()
                .table_name("hits")
                .partition_key(["page"])
                .column("total", |c| c.as_counter()),
        );
    config
}

/// Records every statement and answers with a fixed row set.
#[derive(Default)]
pub struct RecordingSession {
    pub keyspace: Option<String>,
    pub response: RowSet,
    pub executed: Mutex<Vec<Statement>>,
}

impl RecordingSession {
    pub fn in_keyspace(keyspace: &str) -> Self {
        Self {
            keyspace: Some(keyspace.to_string()),
            ..Self::default()
        }
    }

    pub fn answering(response: RowSet) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<Statement> {
        self.executed.lock().unwrap().clone()
    }
}

impl Session for RecordingSession {
    fn keyspace(&self) -> Option<String> {
        self.keyspace.clone()
    }

    async fn execute(&self, statement: &Statement) -> CqlResult<RowSet> {
        if statement.cql.matches('?').count() != statement.params.len() {
            return Err(CqlError::Execution(format!(
                "placeholder count does not match {} bound values",
                statement.params.len()
            )));
        }
        self.executed.lock().unwrap().push(statement.clone());
        Ok(self.response.clone())
    }
}
