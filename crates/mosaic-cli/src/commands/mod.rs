pub mod check;
pub mod layout;
pub mod resolve;
pub mod run;
