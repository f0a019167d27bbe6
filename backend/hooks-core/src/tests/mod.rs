mod config;
mod dispatch;
mod line_reader;
mod support;
