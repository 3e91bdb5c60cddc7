pub mod assemble;
pub mod assign;
pub mod scan;
