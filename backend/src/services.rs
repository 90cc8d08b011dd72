pub mod assembler;
pub mod publisher;
pub mod session;
pub mod shotgrid;
pub mod tractor;
