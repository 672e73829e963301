use crate::models::CreateCodeBlockRequest;

/// Starter exercises loaded into an empty store
pub fn initial_code_blocks() -> Vec<CreateCodeBlockRequest> {
    vec![
        block(
            "Factorial Function",
            "function factorial(n) {\n  // your code here\n}",
            "function factorial(n) {\n  if (n === 0) return 1;\n  return n * factorial(n - 1);\n}",
            "Implement a function that returns the factorial of a given number n.",
        ),
        block(
            "Find Maximum",
            "function findMax(arr) {\n  // your code here\n}",
            "function findMax(arr) {\n  return Math.max(...arr);\n}",
            "Write a function that receives an array and returns its largest number.",
        ),
        block(
            "Reverse String",
            "function reverseString(str) {\n  // your code here\n}",
            "function reverseString(str) {\n  return str.split('').reverse().join('');\n}",
            "Create a function that returns the reverse of a given string.",
        ),
        block(
            "Check Prime",
            "function isPrime(n) {\n  // your code here\n}",
            "function isPrime(n) {\n  if (n <= 1) return false;\n  for (let i = 2; i <= Math.sqrt(n); i++) {\n    if (n % i === 0) return false;\n  }\n  return true;\n}",
            "Build a function that checks whether a given number is a prime number.",
        ),
    ]
}

fn block(title: &str, initial_code: &str, solution: &str, description: &str) -> CreateCodeBlockRequest {
    CreateCodeBlockRequest {
        title: title.to_string(),
        initial_code: initial_code.to_string(),
        solution: solution.to_string(),
        description: Some(description.to_string()),
    }
}
