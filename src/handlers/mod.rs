pub mod run;
pub mod snippet;
