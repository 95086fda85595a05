pub mod action;
pub mod parse;
pub mod push;
pub mod token;
pub mod view;
