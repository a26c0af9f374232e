use crate::models::NotesPage;
use std::rc::Rc;

/// Page size used for every notes query.
pub(crate) const NOTES_PER_PAGE: u32 = 12;

/// Identity of one cached notes page: page number, stabilized search text and page size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct QueryKey {
    pub page: u32,
    pub search: String,
    pub per_page: u32,
}

impl QueryKey {
    pub fn new(page: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            search: search.into(),
            per_page: NOTES_PER_PAGE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum QueryResult {
    Pending,
    Ready(Rc<NotesPage>),
    /// Terminal until the key is invalidated; holds a message fit for display.
    Failed(String),
}

impl QueryResult {
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn data(&self) -> Option<&Rc<NotesPage>> {
        match self {
            Self::Ready(page) => Some(page),
            _ => None,
        }
    }
}
