pub mod answer;
pub mod question;
pub mod result;
pub mod severity;
pub mod stats;
pub mod test;
pub mod user;
