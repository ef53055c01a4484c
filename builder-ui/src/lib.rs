pub mod components;
pub mod demo;
pub mod hooks;
pub mod host;
pub mod interop;
pub mod page;

pub use components::*;
pub use demo::*;
pub use hooks::*;
pub use host::*;
pub use interop::*;
pub use page::*;
