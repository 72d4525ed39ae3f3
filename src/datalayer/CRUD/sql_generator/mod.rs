pub mod sql_generator;
