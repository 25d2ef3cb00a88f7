mod details;
mod import;
mod words;
