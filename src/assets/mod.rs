//! Asset Loading
//!
//! Assets are fetched off the tick thread by an [`AssetLoader`] and handed
//! back through a single-consumer completion channel. The frame scheduler
//! drains that channel at the start of each tick and integrates each
//! completed payload in one step.

pub mod loader;
pub mod payload;

pub use loader::{AssetLoader, CompletionReceiver, CompletionSender, LoadCompletion, LoadRequest, completion_channel};
pub use payload::{AssetNode, AssetPayload, AssetSource, MemoryAssetSource};
