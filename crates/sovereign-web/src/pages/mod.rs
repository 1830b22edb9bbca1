//! Page Components

mod desk;

pub use desk::DeskPage;
