pub mod schema;
pub mod domain;
pub mod prelude;
pub mod utilities;
pub mod queries;
pub mod mock;
