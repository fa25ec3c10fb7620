mod response;

pub use response::{emit, print_error};
