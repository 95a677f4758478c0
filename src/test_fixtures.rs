//! Entity types shared by unit tests.

use crate::ast::Value;
use crate::mapping::{CqlType, Entity, MemberInfo};

#[derive(Debug, Clone, Default)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

impl Entity for Person {
    fn type_name() -> &'static str {
        "Person"
    }

    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("id", CqlType::Int),
            MemberInfo::new("name", CqlType::Text),
            MemberInfo::new("age", CqlType::Int),
        ]
    }

    fn value_of(&self, member: &str) -> Option<Value> {
        match member {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "age" => Some(self.age.into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Song {
    pub artist: String,
    pub album: String,
    pub track: i32,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub credits: Vec<(String, String)>,
    pub lyrics: Vec<String>,
    pub plays: i64,
}

impl Entity for Song {
    fn type_name() -> &'static str {
        "Song"
    }

    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("artist", CqlType::Text),
            MemberInfo::new("album", CqlType::Text),
            MemberInfo::new("track", CqlType::Int),
            MemberInfo::new("title", CqlType::Text),
            MemberInfo::new("tags", CqlType::set(CqlType::Text)),
            MemberInfo::new("credits", CqlType::map(CqlType::Text, CqlType::Text)),
            MemberInfo::new("lyrics", CqlType::list(CqlType::Text)),
            MemberInfo::new("plays", CqlType::BigInt),
        ]
    }

    fn value_of(&self, member: &str) -> Option<Value> {
        match member {
            "artist" => Some(self.artist.clone().into()),
            "album" => Some(self.album.clone().into()),
            "track" => Some(self.track.into()),
            "title" => Some(self.title.clone().into()),
            "tags" => Some(Value::Set(self.tags.iter().map(|t| t.as_str().into()).collect())),
            "credits" => Some(Value::Map(
                self.credits
                    .iter()
                    .map(|(k, v)| (k.as_str().into(), v.as_str().into()))
                    .collect(),
            )),
            "lyrics" => Some(self.lyrics.clone().into()),
            "plays" => Some(self.plays.into()),
            _ => None,
        }
    }
}

/// A counter table.
#[derive(Debug, Clone, Default)]
pub struct PageViews {
    pub url: String,
    pub day: String,
    pub views: i64,
}

impl Entity for PageViews {
    fn type_name() -> &'static str {
        "PageViews"
    }

    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("url", CqlType::Text),
            MemberInfo::new("day", CqlType::Text),
            MemberInfo::new("views", CqlType::BigInt),
        ]
    }

    fn value_of(&self, member: &str) -> Option<Value> {
        match member {
            "url" => Some(self.url.clone().into()),
            "day" => Some(self.day.clone().into()),
            "views" => Some(self.views.into()),
            _ => None,
        }
    }
}
