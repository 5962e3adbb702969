pub mod ordering;
pub mod todo_state;

pub use ordering::{compare_for_display, display_order, sort_for_display};
pub use todo_state::TodoState;
