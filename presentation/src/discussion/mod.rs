//! Driving a discussion stream to the terminal

pub mod presenter;
