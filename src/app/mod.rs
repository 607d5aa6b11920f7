mod prompt;
mod run;

pub use run::run;
