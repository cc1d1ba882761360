//! Casting Agency models.
//!
//! Database rows double as the wire representation: serializing an
//! [`Actor`] or [`Movie`] yields the formatted record returned by every
//! endpoint.

use crate::errors::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Rows
// ============================================================================

/// Actor row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
}

/// Movie row. `release_date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_date: NaiveDate,
}

// ============================================================================
// Partial updates
// ============================================================================

/// A field of a partial-update body.
///
/// Distinguishes a key that was left out (`Absent`) from one sent as
/// `null` (`Null`). Use with `#[serde(default)]` so missing keys
/// deserialize to `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    /// Whether the key was present in the request body, even as `null`.
    pub fn is_present(&self) -> bool {
        !matches!(self, Patch::Absent)
    }

    /// The value to write; `None` for both `Absent` and `Null`.
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(value) => Some(value),
            Patch::Absent | Patch::Null => None,
        }
    }

    /// Map the contained value, keeping `Absent` and `Null` as they are.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(value) => Patch::Value(f(value)?),
        })
    }
}

// ============================================================================
// Actor API models
// ============================================================================

pub const ACTOR_NAME_MISSING: &str = "Name of actor not provided";
pub const ACTOR_AGE_MISSING: &str = "Age of actor not provided";
pub const ACTOR_GENDER_MISSING: &str = "Gender of actor not provided";

/// Request body for `POST /actors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateActorRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

/// Validated actor ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl CreateActorRequest {
    /// Check required fields in order: name, age, gender.
    ///
    /// Empty strings and an age of zero count as not provided. Negative ages
    /// pass here and are rejected by the database constraint.
    pub fn validate(self) -> Result<NewActor, ApiError> {
        let name = self
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::unprocessable(ACTOR_NAME_MISSING))?;
        let age = self
            .age
            .filter(|age| *age != 0)
            .ok_or_else(|| ApiError::unprocessable(ACTOR_AGE_MISSING))?;
        let gender = self
            .gender
            .filter(|gender| !gender.is_empty())
            .ok_or_else(|| ApiError::unprocessable(ACTOR_GENDER_MISSING))?;

        Ok(NewActor { name, age, gender })
    }
}

/// Request body for `PATCH /actors/{id}`. Also the change set passed to the
/// repository: only present keys are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateActorRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub age: Patch<i32>,
    #[serde(default)]
    pub gender: Patch<String>,
}

/// Response for `GET /actors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorListResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

/// Response for `POST /actors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorAddedResponse {
    pub success: bool,
    pub actor_added: Actor,
}

/// Response for `PATCH /actors/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: Actor,
}

/// Response for `DELETE /actors/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorDeletedResponse {
    pub success: bool,
    pub deleted_actor: Actor,
}

// ============================================================================
// Movie API models
// ============================================================================

pub const MOVIE_TITLE_MISSING: &str = "Title of movie not provided";
pub const MOVIE_RELEASE_DATE_MISSING: &str = "Release date of movie not provided";

/// Wire format for release dates.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Request body for `POST /movies`.
///
/// `release_date` arrives as a string so that an empty value is reported as
/// missing rather than as a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

/// Validated movie ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDate,
}

/// A release date that is present but not `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidReleaseDate(pub String);

/// Parse a release date in wire format.
pub fn parse_release_date(value: &str) -> Result<NaiveDate, InvalidReleaseDate> {
    NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT)
        .map_err(|_| InvalidReleaseDate(value.to_string()))
}

/// Outcome of validating a movie creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieValidation {
    Valid(NewMovie),
    /// A required field is missing or empty; carries the client message.
    Missing(&'static str),
    /// Fields are present but the date cannot be stored.
    InvalidDate(InvalidReleaseDate),
}

impl CreateMovieRequest {
    /// Check required fields in order: title, release date.
    pub fn validate(self) -> MovieValidation {
        let Some(title) = self.title.filter(|title| !title.is_empty()) else {
            return MovieValidation::Missing(MOVIE_TITLE_MISSING);
        };
        let Some(release_date) = self.release_date.filter(|date| !date.is_empty()) else {
            return MovieValidation::Missing(MOVIE_RELEASE_DATE_MISSING);
        };

        match parse_release_date(&release_date) {
            Ok(release_date) => MovieValidation::Valid(NewMovie {
                title,
                release_date,
            }),
            Err(err) => MovieValidation::InvalidDate(err),
        }
    }
}

/// Request body for `PATCH /movies/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMovieRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub release_date: Patch<String>,
}

/// Change set for a movie; only present keys are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieChanges {
    pub title: Patch<String>,
    pub release_date: Patch<NaiveDate>,
}

impl UpdateMovieRequest {
    /// Parse the release date, if one was sent.
    pub fn into_changes(self) -> Result<MovieChanges, InvalidReleaseDate> {
        Ok(MovieChanges {
            title: self.title,
            release_date: self
                .release_date
                .try_map(|date| parse_release_date(&date))?,
        })
    }
}

/// Response for `GET /movies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieListResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

/// Response for `POST /movies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieAddedResponse {
    pub success: bool,
    pub movie_added: Movie,
}

/// Response for `PATCH /movies/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: Movie,
}

/// Response for `DELETE /movies/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDeletedResponse {
    pub success: bool,
    pub deleted_movie: Movie,
}

// ============================================================================
// Operational models
// ============================================================================

/// Health check response, returned by `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy".
    pub status: String,

    /// Database connectivity ("healthy" or "unhealthy").
    pub database: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn unprocessable_message(err: ApiError) -> String {
        match err {
            ApiError::Unprocessable(Some(message)) => message,
            other => panic!("expected Unprocessable with message, got {other:?}"),
        }
    }

    #[test]
    fn test_actor_serializes_as_formatted_record() {
        let actor = Actor {
            id: 3,
            name: "Tom Hanks".to_string(),
            age: 64,
            gender: "male".to_string(),
        };

        let json = serde_json::to_value(&actor).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "name": "Tom Hanks", "age": 64, "gender": "male"})
        );
    }

    #[test]
    fn test_movie_release_date_wire_format() {
        let movie = Movie {
            id: 1,
            title: "Cast Away".to_string(),
            release_date: NaiveDate::from_ymd_opt(2000, 12, 22).unwrap(),
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["release_date"], "2000-12-22");
    }

    #[test]
    fn test_patch_distinguishes_absent_null_and_value() {
        let body: UpdateActorRequest =
            serde_json::from_str(r#"{"age": 43, "gender": null}"#).unwrap();

        assert_eq!(body.name, Patch::Absent);
        assert_eq!(body.age, Patch::Value(43));
        assert_eq!(body.gender, Patch::Null);
        assert!(!body.name.is_present());
        assert!(body.gender.is_present());
    }

    #[test]
    fn test_patch_empty_body_changes_nothing() {
        let body: UpdateActorRequest = serde_json::from_str("{}").unwrap();
        assert!(!body.name.is_present());
        assert!(!body.age.is_present());
        assert!(!body.gender.is_present());
    }

    #[test]
    fn test_patch_into_value() {
        assert_eq!(Patch::Value(5).into_value(), Some(5));
        assert_eq!(Patch::<i32>::Null.into_value(), None);
        assert_eq!(Patch::<i32>::Absent.into_value(), None);
    }

    #[test]
    fn test_create_actor_validate_success() {
        let request = CreateActorRequest {
            name: Some("Meryl Streep".to_string()),
            age: Some(71),
            gender: Some("female".to_string()),
        };

        assert_eq!(
            request.validate().unwrap(),
            NewActor {
                name: "Meryl Streep".to_string(),
                age: 71,
                gender: "female".to_string(),
            }
        );
    }

    #[test]
    fn test_create_actor_missing_name() {
        let request: CreateActorRequest =
            serde_json::from_str(r#"{"age": 42, "gender": "male"}"#).unwrap();
        assert_eq!(
            unprocessable_message(request.validate().unwrap_err()),
            ACTOR_NAME_MISSING
        );
    }

    #[test]
    fn test_create_actor_empty_and_zero_count_as_missing() {
        let empty_name = CreateActorRequest {
            name: Some(String::new()),
            age: Some(30),
            gender: Some("male".to_string()),
        };
        assert_eq!(
            unprocessable_message(empty_name.validate().unwrap_err()),
            ACTOR_NAME_MISSING
        );

        let zero_age = CreateActorRequest {
            name: Some("A".to_string()),
            age: Some(0),
            gender: Some("male".to_string()),
        };
        assert_eq!(
            unprocessable_message(zero_age.validate().unwrap_err()),
            ACTOR_AGE_MISSING
        );

        let no_gender = CreateActorRequest {
            name: Some("A".to_string()),
            age: Some(30),
            gender: None,
        };
        assert_eq!(
            unprocessable_message(no_gender.validate().unwrap_err()),
            ACTOR_GENDER_MISSING
        );
    }

    #[test]
    fn test_create_actor_reports_first_missing_field() {
        let request = CreateActorRequest::default();
        assert_eq!(
            unprocessable_message(request.validate().unwrap_err()),
            ACTOR_NAME_MISSING
        );
    }

    #[test]
    fn test_create_movie_validate() {
        let request: CreateMovieRequest =
            serde_json::from_str(r#"{"title": "Heat", "release_date": "1995-12-15"}"#).unwrap();
        assert_eq!(
            request.validate(),
            MovieValidation::Valid(NewMovie {
                title: "Heat".to_string(),
                release_date: NaiveDate::from_ymd_opt(1995, 12, 15).unwrap(),
            })
        );
    }

    #[test]
    fn test_create_movie_missing_fields() {
        let no_title: CreateMovieRequest =
            serde_json::from_str(r#"{"release_date": "1995-12-15"}"#).unwrap();
        assert_eq!(
            no_title.validate(),
            MovieValidation::Missing(MOVIE_TITLE_MISSING)
        );

        let empty_date: CreateMovieRequest =
            serde_json::from_str(r#"{"title": "Heat", "release_date": ""}"#).unwrap();
        assert_eq!(
            empty_date.validate(),
            MovieValidation::Missing(MOVIE_RELEASE_DATE_MISSING)
        );
    }

    #[test]
    fn test_create_movie_invalid_date() {
        let request: CreateMovieRequest =
            serde_json::from_str(r#"{"title": "Heat", "release_date": "15/12/1995"}"#).unwrap();
        assert_eq!(
            request.validate(),
            MovieValidation::InvalidDate(InvalidReleaseDate("15/12/1995".to_string()))
        );
    }

    #[test]
    fn test_update_movie_into_changes() {
        let request: UpdateMovieRequest =
            serde_json::from_str(r#"{"release_date": "2021-07-30"}"#).unwrap();
        let changes = request.into_changes().unwrap();

        assert_eq!(changes.title, Patch::Absent);
        assert_eq!(
            changes.release_date,
            Patch::Value(NaiveDate::from_ymd_opt(2021, 7, 30).unwrap())
        );

        let null_date: UpdateMovieRequest =
            serde_json::from_str(r#"{"release_date": null}"#).unwrap();
        assert_eq!(null_date.into_changes().unwrap().release_date, Patch::Null);

        let bad_date: UpdateMovieRequest =
            serde_json::from_str(r#"{"release_date": "soon"}"#).unwrap();
        assert!(bad_date.into_changes().is_err());
    }
}
