pub mod filesystem;
pub mod keywords;
pub mod naming;

pub use filesystem::*;
pub use keywords::is_reserved_keyword;
pub use naming::*;
