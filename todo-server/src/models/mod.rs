//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod pagination;
pub mod todo;
pub mod validation;

pub use pagination::{Pagination, PaginationParams};
pub use todo::{Email, FullName, NewTodo, Todo, TodoChanges, Username};
pub use validation::ValidationError;
