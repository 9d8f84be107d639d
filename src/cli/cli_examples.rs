use super::cli_main::get_user_input;
use crate::Examples::wall_function_examples::wall_function_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Single face");
        println!("2. Wall distance sweep");
        println!("3. Converged faces with a user tolerance");
        println!("4. Heated wall");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => wall_function_examples(0),
            "2" => wall_function_examples(1),
            "3" => wall_function_examples(2),
            "4" => wall_function_examples(3),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
