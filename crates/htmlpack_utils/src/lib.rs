pub mod indexmap;
