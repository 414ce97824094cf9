pub mod analyze;
pub mod language;

pub use analyze::*;
pub use language::Language;
