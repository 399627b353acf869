// Background loading: manifest fetch, downloads, and cached image decoding
use crate::assets::{self, AssetLocation};
use crate::error::{GalleryError, Result};
use crate::preview::{self, RenderedImage};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot, Mutex};

/// Maximum number of rendered images kept in memory
const CACHE_SIZE: usize = 64;

/// Pending request queue depth
const QUEUE_DEPTH: usize = 64;

/// An image to fetch, decode, and fit into a cell box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub location: AssetLocation,
    pub max_cols: u16,
    pub max_rows: u16,
}

impl ImageRequest {
    pub fn new(location: AssetLocation, max_cols: u16, max_rows: u16) -> Self {
        Self {
            location,
            max_cols,
            max_rows,
        }
    }

    /// Cache key; the same asset at a different size is a different entry
    pub fn key(&self) -> String {
        format!(
            "{}@{}x{}",
            self.location.as_uri(),
            self.max_cols,
            self.max_rows
        )
    }
}

/// Loading state of one image
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Ready(RenderedImage),
    Error(String),
}

/// Anything the renderer can ask for images
pub trait ImageSource {
    /// Returns immediately; `Loading` until the image is ready
    fn image(&mut self, request: &ImageRequest) -> ImageState;
}

struct LoadRequest {
    request: ImageRequest,
    response_tx: oneshot::Sender<ImageState>,
}

/// LRU cache of rendered images
#[derive(Debug)]
struct ImageCache {
    cache: HashMap<String, RenderedImage>,
    /// Most recently used at the end
    access_order: Vec<String>,
    max_size: usize,
}

impl ImageCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    fn get(&mut self, key: &str) -> Option<RenderedImage> {
        let image = self.cache.get(key)?.clone();
        self.access_order.retain(|k| k != key);
        self.access_order.push(key.to_string());
        Some(image)
    }

    fn insert(&mut self, key: String, image: RenderedImage) {
        if self.cache.contains_key(&key) {
            self.access_order.retain(|k| k != &key);
        } else if self.cache.len() >= self.max_size {
            if let Some(oldest) = self.access_order.first().cloned() {
                self.cache.remove(&oldest);
                self.access_order.remove(0);
            }
        }

        self.cache.insert(key.clone(), image);
        self.access_order.push(key);
    }

    #[cfg(test)]
    fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Fetches and renders one image
async fn load_image(request: ImageRequest) -> Result<RenderedImage> {
    let bytes = assets::fetch_bytes(&request.location).await?;
    let (cols, rows) = (request.max_cols, request.max_rows);
    tokio::task::spawn_blocking(move || preview::render_bytes(&bytes, cols, rows))
        .await
        .map_err(|e| GalleryError::LoaderStopped(format!("decode task panicked: {}", e)))?
}

/// Handle for sending requests to the image worker; the worker exits once
/// every handle is dropped
#[derive(Clone)]
pub(crate) struct ImageLoader {
    request_tx: mpsc::Sender<LoadRequest>,
    cache: Arc<Mutex<ImageCache>>,
}

impl ImageLoader {
    /// Creates the loader and spawns its worker; must run inside a tokio runtime
    pub fn new() -> Self {
        let (request_tx, request_rx) = mpsc::channel(QUEUE_DEPTH);
        let cache = Arc::new(Mutex::new(ImageCache::new(CACHE_SIZE)));

        let worker_cache = Arc::clone(&cache);
        tokio::spawn(async move {
            Self::worker(request_rx, worker_cache).await;
        });

        Self { request_tx, cache }
    }

    async fn worker(mut request_rx: mpsc::Receiver<LoadRequest>, cache: Arc<Mutex<ImageCache>>) {
        while let Some(LoadRequest {
            request,
            response_tx,
        }) = request_rx.recv().await
        {
            let key = request.key();

            if let Some(cached) = cache.lock().await.get(&key) {
                let _ = response_tx.send(ImageState::Ready(cached));
                continue;
            }

            // Each image loads on its own task so visible cards fill in together
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                let state = match load_image(request).await {
                    Ok(image) => {
                        cache.lock().await.insert(key.clone(), image.clone());
                        ImageState::Ready(image)
                    }
                    Err(e) => {
                        tracing::warn!(asset = %key, error = %e, "image load failed");
                        ImageState::Error(e.to_string())
                    }
                };
                let _ = response_tx.send(state);
            });
        }
        tracing::debug!("image worker stopped");
    }

    /// Queues a request without waiting; `None` if the queue is full or closed
    fn enqueue(&self, request: &ImageRequest) -> Option<oneshot::Receiver<ImageState>> {
        let (response_tx, response_rx) = oneshot::channel();
        let message = LoadRequest {
            request: request.clone(),
            response_tx,
        };
        self.request_tx.try_send(message).ok()?;
        Some(response_rx)
    }

    pub async fn get_cached(&self, key: &str) -> Option<RenderedImage> {
        self.cache.lock().await.get(key)
    }

    #[cfg(test)]
    pub async fn cache_size(&self) -> usize {
        self.cache.lock().await.len()
    }
}

/// A background task whose result is collected by polling
pub struct PendingTask<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> PendingTask<T> {
    /// `None` while running; the result exactly once when finished
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(GalleryError::LoaderStopped(
                "task dropped before finishing".to_string(),
            ))),
        }
    }
}

/// Owns the tokio runtime and exposes non-blocking calls to the synchronous UI loop
pub struct SyncLoader {
    runtime: Runtime,
    images: ImageLoader,
    pending: HashMap<String, oneshot::Receiver<ImageState>>,
    /// Failures are remembered so a broken thumbnail is not refetched every frame
    failed: HashMap<String, String>,
}

impl SyncLoader {
    pub fn new() -> Result<Self> {
        let runtime = Runtime::new()?;
        let images = {
            let _guard = runtime.enter();
            ImageLoader::new()
        };

        Ok(Self {
            runtime,
            images,
            pending: HashMap::new(),
            failed: HashMap::new(),
        })
    }

    /// Runs `future` in the background
    pub fn spawn<T, F>(&self, future: F) -> PendingTask<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let _ = tx.send(future.await);
        });
        PendingTask { receiver: rx }
    }

    /// Number of rendered images held in memory
    #[cfg(test)]
    fn cache_size(&self) -> usize {
        self.runtime.block_on(self.images.cache_size())
    }

    #[cfg(test)]
    fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl ImageSource for SyncLoader {
    fn image(&mut self, request: &ImageRequest) -> ImageState {
        let key = request.key();

        if let Some(message) = self.failed.get(&key) {
            return ImageState::Error(message.clone());
        }

        if let Some(receiver) = self.pending.get_mut(&key) {
            match receiver.try_recv() {
                Ok(state) => {
                    self.pending.remove(&key);
                    if let ImageState::Error(ref message) = state {
                        self.failed.insert(key, message.clone());
                    }
                    return state;
                }
                Err(oneshot::error::TryRecvError::Empty) => return ImageState::Loading,
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.pending.remove(&key);
                    let message = "Image channel closed".to_string();
                    self.failed.insert(key, message.clone());
                    return ImageState::Error(message);
                }
            }
        }

        if let Some(cached) = self.runtime.block_on(self.images.get_cached(&key)) {
            return ImageState::Ready(cached);
        }

        if let Some(receiver) = self.images.enqueue(request) {
            self.pending.insert(key, receiver);
        }
        ImageState::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    fn rendered(tag: u8) -> RenderedImage {
        RenderedImage {
            lines: Vec::new(),
            source_width: tag as u32,
            source_height: tag as u32,
        }
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbImage::from_fn(16, 16, |_, _| image::Rgb([0, 128, 255]));
        img.save(&path).unwrap();
        path
    }

    fn request_for(path: PathBuf) -> ImageRequest {
        ImageRequest::new(AssetLocation::Local(path), 8, 4)
    }

    mod cache_tests {
        use super::*;

        #[test]
        fn test_cache_new() {
            let cache = ImageCache::new(5);
            assert!(cache.is_empty());
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn test_cache_insert_and_get() {
            let mut cache = ImageCache::new(5);
            cache.insert("a".to_string(), rendered(1));

            assert!(cache.contains("a"));
            assert_eq!(cache.get("a").unwrap().source_width, 1);
            assert!(cache.get("b").is_none());
        }

        #[test]
        fn test_cache_lru_eviction() {
            let mut cache = ImageCache::new(3);
            for i in 0..3 {
                cache.insert(format!("img{}", i), rendered(i));
            }
            cache.insert("img3".to_string(), rendered(3));

            assert_eq!(cache.len(), 3);
            assert!(!cache.contains("img0"));
            assert!(cache.contains("img1"));
            assert!(cache.contains("img3"));
        }

        #[test]
        fn test_cache_access_updates_order() {
            let mut cache = ImageCache::new(3);
            for i in 0..3 {
                cache.insert(format!("img{}", i), rendered(i));
            }
            let _ = cache.get("img0");
            cache.insert("img3".to_string(), rendered(3));

            assert!(cache.contains("img0"));
            assert!(!cache.contains("img1"));
        }

        #[test]
        fn test_cache_update_existing() {
            let mut cache = ImageCache::new(2);
            cache.insert("a".to_string(), rendered(1));
            cache.insert("a".to_string(), rendered(2));

            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get("a").unwrap().source_width, 2);
        }
    }

    #[test]
    fn test_request_key_includes_size() {
        let a = ImageRequest::new(AssetLocation::Local(PathBuf::from("a.png")), 8, 4);
        let b = ImageRequest::new(AssetLocation::Local(PathBuf::from("a.png")), 16, 4);
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), "a.png@8x4");
    }

    mod async_loader_tests {
        use super::*;

        async fn load(loader: &ImageLoader, request: &ImageRequest) -> ImageState {
            loader.enqueue(request).unwrap().await.unwrap()
        }

        #[tokio::test]
        async fn test_loader_caches_result() {
            let dir = TempDir::new().unwrap();
            let request = request_for(write_png(dir.path(), "thumb.png"));

            let loader = ImageLoader::new();
            let state = load(&loader, &request).await;
            assert!(matches!(state, ImageState::Ready(_)));
            assert!(loader.get_cached(&request.key()).await.is_some());

            let again = load(&loader, &request).await;
            assert!(matches!(again, ImageState::Ready(_)));
            assert_eq!(loader.cache_size().await, 1);
        }

        #[tokio::test]
        async fn test_loader_reports_missing_file() {
            let loader = ImageLoader::new();
            let state = load(&loader, &request_for(PathBuf::from("/nonexistent/thumb.png"))).await;
            assert!(matches!(state, ImageState::Error(_)));
            assert_eq!(loader.cache_size().await, 0);
        }

        #[tokio::test]
        async fn test_loader_reports_undecodable_file() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("broken.png");
            std::fs::write(&path, b"not a png").unwrap();

            let loader = ImageLoader::new();
            let state = load(&loader, &request_for(path)).await;
            assert!(matches!(state, ImageState::Error(_)));
        }

        #[tokio::test]
        async fn test_loader_sizes_are_cached_separately() {
            let dir = TempDir::new().unwrap();
            let path = write_png(dir.path(), "thumb.png");
            let small = ImageRequest::new(AssetLocation::Local(path.clone()), 4, 2);
            let large = ImageRequest::new(AssetLocation::Local(path), 16, 8);

            let loader = ImageLoader::new();
            assert!(matches!(load(&loader, &small).await, ImageState::Ready(_)));
            assert!(loader.get_cached(&large.key()).await.is_none());
            assert!(matches!(load(&loader, &large).await, ImageState::Ready(_)));
            assert_eq!(loader.cache_size().await, 2);
        }
    }

    mod sync_loader_tests {
        use super::*;

        fn poll_until_ready(loader: &mut SyncLoader, request: &ImageRequest) -> ImageState {
            for _ in 0..40 {
                let state = loader.image(request);
                if !matches!(state, ImageState::Loading) {
                    return state;
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            ImageState::Loading
        }

        #[test]
        fn test_sync_loader_creation() {
            let loader = SyncLoader::new().unwrap();
            assert_eq!(loader.cache_size(), 0);
            assert_eq!(loader.pending_count(), 0);
        }

        #[test]
        fn test_first_request_is_loading() {
            let dir = TempDir::new().unwrap();
            let request = request_for(write_png(dir.path(), "thumb.png"));

            let mut loader = SyncLoader::new().unwrap();
            assert!(matches!(loader.image(&request), ImageState::Loading));
        }

        #[test]
        fn test_sync_loader_becomes_ready_and_caches() {
            let dir = TempDir::new().unwrap();
            let request = request_for(write_png(dir.path(), "thumb.png"));

            let mut loader = SyncLoader::new().unwrap();
            let state = poll_until_ready(&mut loader, &request);
            assert!(matches!(state, ImageState::Ready(_)));
            assert_eq!(loader.cache_size(), 1);
            assert!(matches!(loader.image(&request), ImageState::Ready(_)));
        }

        #[test]
        fn test_sync_loader_remembers_failures() {
            let request = request_for(PathBuf::from("/nonexistent/thumb.png"));

            let mut loader = SyncLoader::new().unwrap();
            let state = poll_until_ready(&mut loader, &request);
            assert!(matches!(state, ImageState::Error(_)));
            assert_eq!(loader.pending_count(), 0);
            assert!(matches!(loader.image(&request), ImageState::Error(_)));
        }

        #[test]
        fn test_spawned_task_result_is_taken_once() {
            let loader = SyncLoader::new().unwrap();
            let mut task = loader.spawn(async { Ok(7_u32) });

            let mut result = None;
            for _ in 0..40 {
                if let Some(r) = task.try_take() {
                    result = Some(r);
                    break;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            assert_eq!(result.unwrap().unwrap(), 7);
        }

        #[test]
        fn test_spawned_task_error_is_reported() {
            let loader = SyncLoader::new().unwrap();
            let mut task: PendingTask<()> =
                loader.spawn(async { Err(GalleryError::Download("nope".to_string())) });

            let mut result = None;
            for _ in 0..40 {
                if let Some(r) = task.try_take() {
                    result = Some(r);
                    break;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            assert!(matches!(result, Some(Err(GalleryError::Download(_)))));
        }
    }
}
