//! The five step kinds of a [`Stack`](crate::Stack).
//!
//! | Step        | Middleware input        | Middleware output           | Forwarded outward |
//! |-------------|-------------------------|-----------------------------|-------------------|
//! | Initialize  | `parameters`            | `result`                    | `parameters`      |
//! | Serialize   | `parameters`, `request` | `result`                    | `request`         |
//! | Build       | `request`               | `result`                    | `request`         |
//! | Finalize    | `request`               | `result`                    | `request`         |
//! | Deserialize | `request`               | `raw_response`, `result`    | `request`         |
//!
//! Serialize is where the transport request is created: every invocation
//! gets a fresh request from the stack's request factory. Deserialize is
//! where the raw transport response is turned into the operation result.

pub mod build;
pub mod deserialize;
pub mod finalize;
pub mod initialize;
pub mod serialize;

pub use build::{Build, BuildInput, BuildOutput, BuildStep};
pub use deserialize::{Deserialize, DeserializeInput, DeserializeOutput, DeserializeStep};
pub use finalize::{Finalize, FinalizeInput, FinalizeOutput, FinalizeStep};
pub use initialize::{Initialize, InitializeInput, InitializeOutput, InitializeStep};
pub use serialize::{NewRequest, Serialize, SerializeInput, SerializeOutput, SerializeStep};
