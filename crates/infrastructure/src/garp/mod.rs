mod client;

pub use client::{encode_frame, GarpClient};
