mod support;

mod checks;
mod scanner;
