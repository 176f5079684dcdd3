//! Domain value objects.

mod parameter;
mod service_type;
mod severity;

pub use parameter::*;
pub use service_type::*;
pub use severity::*;
