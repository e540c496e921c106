// Path tracking controllers

pub mod stanley_controller;

pub use stanley_controller::*;
