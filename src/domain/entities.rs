//! Catalog entities as handed to views.
//!
//! Serialization includes the derived values templates read (display name,
//! lifespan, canonical URL), so a data bag carries everything a template
//! needs without recomputing it view-side.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};

fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Display name, "family, first".
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Lifespan label, open-ended on either side ("Jan 2, 1920 - ").
    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            display_date(self.date_of_birth),
            display_date(self.date_of_death)
        )
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

impl Serialize for Author {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Author", 8)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("first_name", &self.first_name)?;
        s.serialize_field("family_name", &self.family_name)?;
        s.serialize_field("date_of_birth", &self.date_of_birth)?;
        s.serialize_field("date_of_death", &self.date_of_death)?;
        s.serialize_field("name", &self.name())?;
        s.serialize_field("lifespan", &self.lifespan())?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Genre", 3)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    /// Populated author, `None` when unpopulated or the reference dangles.
    pub author: Option<Author>,
    /// Populated genres; empty when unpopulated.
    pub genres: Vec<Genre>,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Book", 8)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("author_id", &self.author_id)?;
        s.serialize_field("summary", &self.summary)?;
        s.serialize_field("isbn", &self.isbn)?;
        s.serialize_field("author", &self.author)?;
        s.serialize_field("genres", &self.genres)?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}

/// Circulation status of a physical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Available,
        Status::Maintenance,
        Status::Loaned,
        Status::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Maintenance => "Maintenance",
            Status::Loaned => "Loaned",
            Status::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Status::Available),
            "Maintenance" => Ok(Status::Maintenance),
            "Loaned" => Ok(Status::Loaned),
            "Reserved" => Ok(Status::Reserved),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: Status,
    pub due_back: Option<NaiveDate>,
    /// Populated book, `None` when unpopulated or the reference dangles.
    pub book: Option<Book>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        display_date(self.due_back)
    }
}

impl Serialize for BookInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("BookInstance", 8)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("book_id", &self.book_id)?;
        s.serialize_field("imprint", &self.imprint)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("due_back", &self.due_back)?;
        s.serialize_field("due_back_formatted", &self.due_back_formatted())?;
        s.serialize_field("book", &self.book)?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}
