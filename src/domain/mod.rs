pub mod event;
pub mod overview;
pub mod rules;
pub mod tally;
