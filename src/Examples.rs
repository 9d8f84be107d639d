pub mod wall_function_examples;
