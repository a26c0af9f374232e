pub mod hooks;
pub mod ui;

mod modal;
mod note_form;
mod note_list;
mod pagination;
mod search_box;

pub(crate) use modal::Modal;
pub(crate) use note_form::NoteForm;
pub(crate) use note_list::NoteList;
pub(crate) use pagination::Pagination;
pub(crate) use search_box::SearchBox;
