pub mod config;
pub mod extract;
pub mod invoke;
pub mod io;
pub mod pipeline;
pub mod record;
pub mod summary;
pub mod table;
