//! Progress indicators shown while a participant is thinking

pub mod reporter;
