//! Domain entities and the rules that produce them from raw input.

mod date;
mod error_record;
mod page;
mod validation;

pub use date::{ACCEPTED_DATE_FORMATS, parse_date_any, parse_date_value};
pub use error_record::{ErrorRecord, NewErrorRecord};
pub use page::{Page, PageRequest, SortOrder};
pub use validation::{FieldCheck, REQUIRED_FIELDS, check_required_fields, parse_count};
