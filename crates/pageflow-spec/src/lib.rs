#![allow(missing_docs)]

pub mod cache;
pub mod decision;
pub mod loader;
pub mod manager;
pub mod options;
pub mod services;
pub mod spec;
pub mod summary;

pub use cache::PageFlowCache;
pub use decision::{AFFIRMATIVE, DecisionError, ErrorKind, Strategy, ValidationError, decide};
pub use loader::{ConditionLoader, DirectoryLoader, LoadError, SummaryLoader};
pub use manager::{PageFlowManager, SubmitError};
pub use services::{SUPPORTED_SERVICES, UnsupportedService, check_service_supported};
pub use spec::{
    Answer, Condition, DisplayLine, DisplayType, Form, Format, NavigationHeader, OptionCatalogue,
    Question, SummaryDefinition,
};
pub use summary::{SummaryAggregator, SummaryError, SummaryStyle, summarize};
