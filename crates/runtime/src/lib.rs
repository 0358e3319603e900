pub mod array;
pub mod budget;
pub mod event_bus;
pub mod frame;
pub mod property;
pub mod scheduler;

pub use array::*;
pub use budget::*;
pub use event_bus::*;
pub use frame::*;
pub use property::*;
pub use scheduler::*;
