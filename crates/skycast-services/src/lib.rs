pub mod backend;
pub mod client;
pub mod editor;
pub mod error;
pub mod records;
pub mod retry;
pub mod typeahead;
pub mod view;

pub use backend::{LocationSearch, RecordStore};
pub use client::WeatherApiClient;
pub use editor::{EditSession, RecordEditor};
pub use error::{ApiError, EditError, LookupError};
pub use records::{DateRange, RecordList, WeatherRecord, WeatherRequest, WeatherResponse};
pub use retry::RetryConfig;
pub use typeahead::{SearchTicket, TypeaheadResolver};
pub use view::{lookup, prepare_location, LookupInput, WeatherView};
