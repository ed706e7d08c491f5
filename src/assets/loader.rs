use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Runtime;

use crate::assets::payload::{AssetPayload, AssetSource};
use crate::config::CharacterConfig;
use crate::errors::{AssetError, Error, Result};
use crate::scene::SceneId;

/// An outstanding asset request.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub id: u64,
    pub uri: String,
    /// Scene lifetime the asset is meant for
    pub scene: SceneId,
    pub placement: CharacterConfig,
}

/// Outcome of one request, delivered exactly once.
#[derive(Debug)]
pub struct LoadCompletion {
    pub request: LoadRequest,
    pub result: std::result::Result<AssetPayload, AssetError>,
}

/// Producer half of the completion channel. Cheap to clone.
#[derive(Clone)]
pub struct CompletionSender {
    tx: flume::Sender<LoadCompletion>,
}

impl CompletionSender {
    /// Publishes a completion. Returns `false` when the consumer is gone.
    pub fn deliver(&self, request: LoadRequest, result: std::result::Result<AssetPayload, AssetError>) -> bool {
        self.tx.send(LoadCompletion { request, result }).is_ok()
    }
}

/// Consumer half of the completion channel, drained by the frame scheduler.
pub struct CompletionReceiver {
    rx: flume::Receiver<LoadCompletion>,
}

impl CompletionReceiver {
    /// Next completed load, without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<LoadCompletion> {
        self.rx.try_recv().ok()
    }

    /// All completions currently queued, without blocking.
    pub fn drain(&self) -> impl Iterator<Item = LoadCompletion> + '_ {
        self.rx.try_iter()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Creates a single-consumer completion channel.
#[must_use]
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    let (tx, rx) = flume::unbounded();
    (CompletionSender { tx }, CompletionReceiver { rx })
}

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Fetches assets on a background runtime and publishes their completions.
///
/// `load` never blocks the caller; the payload shows up on the
/// [`CompletionReceiver`] some ticks later.
pub struct AssetLoader {
    runtime: Runtime,
    source: Arc<dyn AssetSource>,
    sender: CompletionSender,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>, sender: CompletionSender) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("skydome-assets")
            .build()
            .map_err(|e| Error::Runtime(e.to_string()))?;

        Ok(Self {
            runtime,
            source,
            sender,
        })
    }

    /// Starts loading `placement.uri` for `scene`. Returns the request id.
    pub fn load(&self, scene: SceneId, placement: CharacterConfig) -> u64 {
        let request = LoadRequest {
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            uri: placement.uri.clone(),
            scene,
            placement,
        };
        let id = request.id;
        log::info!("Loading asset '{}' (request #{id})", request.uri);

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let uri = request.uri.clone();
            let fetch_uri = uri.clone();
            let result = tokio::task::spawn_blocking(move || source.fetch(&fetch_uri))
                .await
                .unwrap_or_else(|e| {
                    Err(AssetError::Fetch {
                        uri,
                        reason: e.to_string(),
                    })
                });

            if !sender.deliver(request, result) {
                log::debug!("Completion for request #{id} dropped: consumer gone");
            }
        });

        id
    }
}
