pub mod builders;
pub mod eval;
pub mod expr;
pub mod method;
pub mod values;

pub use expr::*;
pub use method::*;
pub use values::*;
