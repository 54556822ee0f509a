#[allow(dead_code)]
pub mod time;
