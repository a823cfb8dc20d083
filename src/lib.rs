// Library for tests to access modules

pub mod cli;
pub mod completion;
pub mod config;
pub mod meetings_api;
pub mod scanner;
pub mod seasons;
pub mod version;
