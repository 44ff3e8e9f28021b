pub mod dates;
pub mod image;
pub mod issue;
pub mod query;
pub mod volume;
