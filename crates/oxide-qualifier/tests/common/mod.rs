#![allow(dead_code)]

use oxide_qualifier::{
    parse, ColumnMetadata, LogicalType, ParseError, Qualifier, TableMetadata, Value,
};
use oxide_qualifier_derive::Members;

#[derive(Debug, Clone, Members)]
pub struct Person {
    pub name: String,
    pub born: Option<i64>,
}

#[derive(Debug, Clone, Members)]
pub struct Movie {
    pub title: String,
    pub year: i64,
    pub rating: Option<f64>,
    #[member(object)]
    pub director: Option<Person>,
    #[member(many)]
    pub cast: Vec<Person>,
    #[member(skip)]
    pub notes: String,
}

pub fn person(name: &str) -> Person {
    Person {
        name: String::from(name),
        born: None,
    }
}

pub fn movie(title: &str, year: i64, director: Option<&str>) -> Movie {
    Movie {
        title: String::from(title),
        year,
        rating: None,
        director: director.map(person),
        cast: vec![],
        notes: String::new(),
    }
}

/// A small catalog with one movie that has no director.
pub fn catalog() -> Vec<Movie> {
    let mut star_wars = movie("Star Wars", 1977, Some("George Lucas"));
    star_wars.rating = Some(8.6);
    star_wars.cast = vec![person("Mark Hamill"), person("Harrison Ford")];
    let mut raiders = movie("Raiders of the Lost Ark", 1981, Some("Steven Spielberg"));
    raiders.rating = Some(8.4);
    raiders.cast = vec![person("Harrison Ford"), person("Karen Allen")];
    let mut alien = movie("Alien", 1979, Some("Ridley Scott"));
    alien.cast = vec![person("Sigourney Weaver")];
    let orphan = movie("Untitled", 1990, None);
    vec![star_wars, raiders, alien, orphan]
}

pub fn titles(movies: &[&Movie]) -> Vec<String> {
    movies.iter().map(|m| m.title.clone()).collect()
}

pub fn parse_ok(format: &str, args: &[Value]) -> Qualifier {
    parse(format, args).unwrap_or_else(|e| panic!("Failed to parse: {format}\nError: {e:?}"))
}

pub fn parse_err(format: &str, args: &[Value]) -> ParseError {
    parse(format, args).expect_err(&format!("Expected parse error for: {format}"))
}

/// `Movie(Title, Year)`, the table every row-limit test selects from.
pub fn movie_columns() -> TableMetadata {
    TableMetadata::new("Movie")
        .column(ColumnMetadata::new("Title", LogicalType::String).max_length(200))
        .column(ColumnMetadata::new("Year", LogicalType::Int32))
}

/// `Movie` with a database-generated key and an interval column.
pub fn movie_table() -> TableMetadata {
    TableMetadata::new("Movie")
        .column(
            ColumnMetadata::new("Id", LogicalType::Int32)
                .primary_key()
                .generated(),
        )
        .column(ColumnMetadata::new("Title", LogicalType::String).max_length(200))
        .column(ColumnMetadata::new("Year", LogicalType::Int32))
        .column(ColumnMetadata::new("Length", LogicalType::Interval))
}
