//! Distance and area measurement on a 2-D web map and a 3-D globe, driven by
//! a host page over JSON-RPC.

pub mod engine;
pub mod geo;
pub mod rpc;
pub mod tools;
