pub mod row;
pub mod store;

pub use row::{NewRow, Number, Row, UnitType, HEADER, TIMESTAMP_FORMAT};
pub use store::{StoreConfig, StoreType};
