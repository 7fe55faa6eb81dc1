//! RPC transport, validator abstraction and broadcast fan-out

mod client;
mod set;
mod validator;

pub use client::{ErrorObject, HttpClient, JsonRpcClient, RawResponse, Request};
pub use set::ValidatorSet;
pub use validator::{RpcValidator, Validator};
