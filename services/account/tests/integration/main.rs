mod code_test;
mod helpers;
mod session_test;
mod token_test;
