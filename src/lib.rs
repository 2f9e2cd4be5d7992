//! Flattens nested JSON records into spreadsheet rows.
//!
//! Each record is expanded into one row per combination of elements from the arrays its
//! configured fields pass through. Within a record, a value already shown for the same
//! owning array element is blanked, and rows that do not disagree on any field are folded
//! together, which gives the "merged cell" look of a hand-edited sheet.
//!
//! ```
//! use json2sheet::generate_rows;
//! use serde_json::json;
//!
//! let records = vec![json!({
//!     "incidentId": "I1",
//!     "responders": [{"agency": "A"}, {"agency": "B"}]
//! })];
//! let rows = generate_rows(&records, &["incidentId", "responders.agency"], "incidentId").unwrap();
//! assert_eq!(rows[0].values(), &["I1", "A"]);
//! assert_eq!(rows[1].values(), &["", "B"]);
//! ```

pub mod config;
pub mod context;
pub mod dedupe;
pub mod error;
pub mod expand;
pub mod fields;
pub mod generator;
pub mod input;
pub mod locator;
pub mod merge;
pub mod output;
pub mod path;
pub mod row;

pub use error::{Error, Result};
pub use fields::FieldConfig;
pub use generator::{generate_rows, GenerateOptions, Report, ReportGenerator, RunStats};
pub use expand::SiblingMode;
pub use row::Row;
