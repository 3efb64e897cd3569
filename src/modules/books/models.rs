use serde::{Deserialize, Serialize};

use super::error::{BookError, BookResult};

/// A book together with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Server-assigned identifier
    pub id: String,
    pub isbn: String,
    pub title: String,
    /// Always embedded in full, never as an identifier
    pub author: Author,
}

/// Author of a book, identified by first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    pub firstname: String,
    pub lastname: String,
}

impl Author {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }

    fn validate(&self) -> BookResult<()> {
        require_non_empty("author.firstname", &self.firstname)?;
        require_non_empty("author.lastname", &self.lastname)
    }
}

/// Request payload for creating a book.
///
/// Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub isbn: String,
    pub title: String,
    pub author: Author,
}

impl CreateBook {
    pub fn validate(&self) -> BookResult<()> {
        require_non_empty("title", &self.title)?;
        self.author.validate()
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBook {
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

impl UpdateBook {
    pub fn validate(&self) -> BookResult<()> {
        if let Some(title) = &self.title {
            require_non_empty("title", title)?;
        }
        match &self.author {
            Some(author) => author.validate(),
            None => Ok(()),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> BookResult<()> {
    if value.trim().is_empty() {
        return Err(BookError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_serializes_with_embedded_author() {
        let book = Book {
            id: "b1".to_string(),
            isbn: "978-0441013593".to_string(),
            title: "Dune".to_string(),
            author: Author::new("Frank", "Herbert"),
        };

        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({
                "id": "b1",
                "isbn": "978-0441013593",
                "title": "Dune",
                "author": {"firstname": "Frank", "lastname": "Herbert"}
            })
        );
    }

    #[test]
    fn create_requires_author() {
        let payload = json!({"isbn": "1", "title": "Dune"});
        assert!(serde_json::from_value::<CreateBook>(payload).is_err());
    }

    #[test]
    fn create_rejects_blank_names() {
        let payload = CreateBook {
            isbn: "1".to_string(),
            title: "Dune".to_string(),
            author: Author::new("  ", "Herbert"),
        };
        assert!(matches!(payload.validate(), Err(BookError::Validation(_))));
    }

    #[test]
    fn update_accepts_partial_payload() {
        let payload: UpdateBook = serde_json::from_value(json!({"title": "Dune Messiah"})).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Dune Messiah"));
        assert!(payload.isbn.is_none());
        assert!(payload.author.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_rejects_blank_title() {
        let payload = UpdateBook {
            title: Some(String::new()),
            ..UpdateBook::default()
        };
        assert!(payload.validate().is_err());
    }
}
