mod common;
mod overlap;
mod service;
