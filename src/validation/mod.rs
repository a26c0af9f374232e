use crate::models::NewNote;
use std::fmt;

pub(crate) const TITLE_MIN_CHARS: usize = 3;
pub(crate) const TITLE_MAX_CHARS: usize = 50;
pub(crate) const CONTENT_MAX_CHARS: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NoteField {
    Title,
    Content,
    Tag,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldErrors {
    errors: Vec<(NoteField, String)>,
}

impl FieldErrors {
    pub fn push(&mut self, field: NoteField, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message for `field`, if any.
    pub fn get(&self, field: NoteField) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &(NoteField, String)> {
        self.errors.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(_, m)| m.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl std::error::Error for FieldErrors {}

/// Field-level rules applied to a create payload before it is sent.
pub(crate) trait NoteValidator {
    fn validate(&self, note: &NewNote) -> Result<(), FieldErrors>;
}

/// NoteHub's form rules. The tag is already constrained by `NoteTag`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NoteRules;

impl NoteValidator for NoteRules {
    fn validate(&self, note: &NewNote) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        let title_len = note.title.chars().count();
        if note.title.trim().is_empty() {
            errors.push(NoteField::Title, "Title is required");
        } else if title_len < TITLE_MIN_CHARS {
            errors.push(
                NoteField::Title,
                format!("Minimum {TITLE_MIN_CHARS} characters"),
            );
        } else if title_len > TITLE_MAX_CHARS {
            errors.push(
                NoteField::Title,
                format!("Maximum {TITLE_MAX_CHARS} characters"),
            );
        }

        if note.content.chars().count() > CONTENT_MAX_CHARS {
            errors.push(
                NoteField::Content,
                format!("Maximum {CONTENT_MAX_CHARS} characters"),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Accepts everything; leaves judgement to the server.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct AcceptAll;

#[cfg(test)]
impl NoteValidator for AcceptAll {
    fn validate(&self, _note: &NewNote) -> Result<(), FieldErrors> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteTag;

    fn draft(title: &str, content: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: content.to_string(),
            tag: NoteTag::Work,
        }
    }

    #[test]
    fn test_blank_title_is_required_error() {
        let errors = NoteRules.validate(&draft("   ", "")).expect_err("blank title");
        assert_eq!(errors.get(NoteField::Title), Some("Title is required"));
        assert_eq!(errors.get(NoteField::Content), None);
    }

    #[test]
    fn test_title_length_bounds() {
        assert!(NoteRules.validate(&draft("ab", "")).is_err());
        assert!(NoteRules.validate(&draft("abc", "")).is_ok());
        assert!(NoteRules.validate(&draft(&"x".repeat(50), "")).is_ok());

        let errors = NoteRules
            .validate(&draft(&"x".repeat(51), ""))
            .expect_err("too long");
        assert_eq!(errors.get(NoteField::Title), Some("Maximum 50 characters"));
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 3 characters, 9 bytes.
        assert!(NoteRules.validate(&draft("日本語", "")).is_ok());
    }

    #[test]
    fn test_content_limit_and_joined_message() {
        let errors = NoteRules
            .validate(&draft("", &"c".repeat(501)))
            .expect_err("two problems");
        assert_eq!(errors.iter().count(), 2);
        assert_eq!(
            errors.to_string(),
            "Title is required; Maximum 500 characters"
        );
    }

    #[test]
    fn test_accept_all_is_permissive() {
        assert!(AcceptAll.validate(&draft("", "")).is_ok());
    }
}
