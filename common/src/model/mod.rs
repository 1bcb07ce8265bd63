pub mod farmer;
pub mod reading;
pub mod settings;
pub mod sync;
