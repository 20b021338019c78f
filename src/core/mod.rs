pub mod etl;
pub mod io;
pub mod pipeline;
pub mod timestamp;
pub mod transform;
pub mod validator;

pub use crate::domain::model::{CleaningReport, CleaningResult, Row, Table, Value};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
