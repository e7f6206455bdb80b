mod ascii;
pub(crate) mod bootstrap;
pub(crate) mod runner;
mod scenario;
mod terrain;
