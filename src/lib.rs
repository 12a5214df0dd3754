//! Personal book catalog: a flat-file store plus a pure query engine
//! (search, sort, report, recommend), served over MCP.

pub mod application;
pub mod domain;
pub mod infra;
pub mod interface;
