pub mod condition;
pub mod form;
pub mod question;
pub mod summary;

pub use condition::Condition;
pub use form::{Form, NavigationHeader};
pub use question::{DisplayType, Format, Question};
pub use summary::{Answer, DisplayLine, OptionCatalogue, SummaryDefinition};
