mod node;
mod parser;
mod query;
