mod arguments;
mod builder;
