pub mod bundle;
pub mod dep_graph;
pub mod manifest;
pub mod raw_idx;
pub mod resource_url;
