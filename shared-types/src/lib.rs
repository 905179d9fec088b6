// Shared models for the fundreq agents crate and CLI

pub mod draft;
pub mod language;
pub mod request;

pub use draft::{Draft, FormField};
pub use language::{LanguageMode, ParseLanguageError};
pub use request::{NewRequest, Request, RequestFields};
