pub mod classify;
pub mod error;
pub mod html;
pub mod model;
pub mod report;
pub mod sanitize;
