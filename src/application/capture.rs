//! Capture device manager: stream ownership, sink lifecycle, chunk buffering

use std::time::Duration as StdDuration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::domain::recording::{MediaArtifact, VideoContainer};

use super::ports::{CaptureConstraints, CaptureDevice, CaptureError, CaptureStream, SinkEvent};

/// Recorder time slice
pub const CHUNK_TIMESLICE: StdDuration = StdDuration::from_secs(1);

/// How long a stopped sink gets to deliver its tail before we stop waiting
pub const FINALIZE_GRACE: StdDuration = StdDuration::from_secs(5);

/// Owns one open input stream and the recording sink bound to it
pub struct CaptureHandle<S: CaptureStream> {
    stream: Option<S>,
    sink: Option<mpsc::UnboundedReceiver<SinkEvent>>,
    buffer: Vec<Vec<u8>>,
    /// Last reason the sink gave for dying
    failure: Option<String>,
    container: VideoContainer,
}

impl<S: CaptureStream> CaptureHandle<S> {
    fn new(stream: S) -> Self {
        let container = stream.container();
        Self {
            stream: Some(stream),
            sink: None,
            buffer: Vec::new(),
            failure: None,
            container,
        }
    }

    /// The input stream has not been released
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// The sink is running
    pub fn is_recording(&self) -> bool {
        self.sink.is_some()
    }

    /// Number of buffered chunks, after collecting whatever the sink has sent so far
    pub fn chunk_count(&mut self) -> usize {
        self.collect_pending();
        self.buffer.len()
    }

    /// Bytes buffered so far
    pub fn buffered_bytes(&mut self) -> usize {
        self.collect_pending();
        self.buffer.iter().map(Vec::len).sum()
    }

    /// Move already-delivered chunks from the sink channel into the buffer
    fn collect_pending(&mut self) {
        let Some(mut events) = self.sink.take() else {
            return;
        };
        loop {
            match events.try_recv() {
                Ok(event) => {
                    if self.absorb(event) {
                        break;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.sink = Some(events);
    }

    /// Record one sink event. Returns true once the sink is done.
    fn absorb(&mut self, event: SinkEvent) -> bool {
        match event {
            SinkEvent::Data(bytes) => {
                if !bytes.is_empty() {
                    self.buffer.push(bytes);
                }
                false
            }
            SinkEvent::Finalized => true,
            SinkEvent::Failed(message) => {
                warn!(%message, "capture sink failed");
                self.failure = Some(message);
                true
            }
        }
    }
}

/// Acquires and releases capture streams and drives their sinks
pub struct CaptureManager<D: CaptureDevice> {
    device: D,
    constraints: CaptureConstraints,
    timeslice: StdDuration,
    finalize_grace: StdDuration,
}

impl<D: CaptureDevice> CaptureManager<D> {
    /// Manager asking for 640x480 video with audio, chunked per second
    pub fn new(device: D) -> Self {
        Self::with_constraints(device, CaptureConstraints::default())
    }

    pub fn with_constraints(device: D, constraints: CaptureConstraints) -> Self {
        Self {
            device,
            constraints,
            timeslice: CHUNK_TIMESLICE,
            finalize_grace: FINALIZE_GRACE,
        }
    }

    /// Open camera and microphone
    pub async fn acquire(&self) -> Result<CaptureHandle<D::Stream>, CaptureError> {
        let stream = self.device.open(&self.constraints).await?;
        info!(
            width = self.constraints.width,
            height = self.constraints.height,
            container = %stream.container(),
            "capture device acquired"
        );
        Ok(CaptureHandle::new(stream))
    }

    /// Start the sink; chunks accumulate in the handle's buffer until `end_recording`
    pub async fn begin_recording(
        &self,
        handle: &mut CaptureHandle<D::Stream>,
    ) -> Result<(), CaptureError> {
        if handle.is_recording() {
            return Err(CaptureError::AlreadyRecording);
        }
        let stream = handle.stream.as_mut().ok_or(CaptureError::StreamClosed)?;

        let events = stream.start_sink(self.timeslice).await?;
        handle.buffer.clear();
        handle.failure = None;
        handle.sink = Some(events);
        info!("recording started");
        Ok(())
    }

    /// Stop the sink, wait for it to finalize, and join the buffered chunks.
    ///
    /// The wait is bounded by the finalize grace period; whatever arrived by
    /// then is kept. Fails with [`CaptureError::RecordingFailed`] if nothing
    /// was captured and the sink reported why, [`CaptureError::EmptyCapture`]
    /// otherwise.
    pub async fn end_recording(
        &self,
        handle: &mut CaptureHandle<D::Stream>,
    ) -> Result<MediaArtifact, CaptureError> {
        handle.collect_pending();
        let mut events = handle.sink.take().ok_or(CaptureError::NotRecording)?;

        let stopped = match handle.stream.as_mut() {
            Some(stream) => stream.stop_sink().await,
            None => Err(CaptureError::StreamClosed),
        };

        match stopped {
            // The last chunk can land after the stop request; wait for the sink to say it is done
            Ok(()) => {
                let finalize = async {
                    while let Some(event) = events.recv().await {
                        if handle.absorb(event) {
                            break;
                        }
                    }
                };
                if tokio::time::timeout(self.finalize_grace, finalize).await.is_err() {
                    warn!(
                        grace_secs = self.finalize_grace.as_secs(),
                        "sink did not finalize in time, keeping delivered chunks"
                    );
                }
            }
            // No finalize will come; keep only what already arrived
            Err(e) => {
                warn!(error = %e, "stop request failed, keeping delivered chunks");
                while let Ok(event) = events.try_recv() {
                    if handle.absorb(event) {
                        break;
                    }
                }
            }
        }

        let chunks = std::mem::take(&mut handle.buffer);
        let failure = handle.failure.take();
        debug!(chunks = chunks.len(), "recording finalized");

        match MediaArtifact::from_chunks(chunks, handle.container) {
            Some(artifact) => {
                info!(size = %artifact.human_readable_size(), "recording stopped");
                Ok(artifact)
            }
            None => Err(failure.map_or(CaptureError::EmptyCapture, CaptureError::RecordingFailed)),
        }
    }

    /// Stop all device tracks and drop the stream.
    ///
    /// Idempotent; returns false when the handle was already released.
    pub async fn release(&self, handle: &mut CaptureHandle<D::Stream>) -> bool {
        handle.sink = None;
        handle.buffer.clear();
        handle.failure = None;
        match handle.stream.take() {
            Some(mut stream) => {
                stream.stop_tracks().await;
                info!("capture device released");
                true
            }
            None => {
                debug!("capture device already released");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Sink that sends `chunks` on start and `late` plus Finalized on stop
    struct ScriptedStream {
        chunks: Vec<Vec<u8>>,
        late: Vec<Vec<u8>>,
        failure: Option<String>,
        finalizes: bool,
        tx: Option<mpsc::UnboundedSender<SinkEvent>>,
        _held: Option<mpsc::UnboundedSender<SinkEvent>>,
        stops: Arc<AtomicUsize>,
        timeslices: Arc<Mutex<Vec<StdDuration>>>,
    }

    #[async_trait]
    impl CaptureStream for ScriptedStream {
        fn container(&self) -> VideoContainer {
            VideoContainer::Mp4
        }

        async fn start_sink(
            &mut self,
            timeslice: StdDuration,
        ) -> Result<mpsc::UnboundedReceiver<SinkEvent>, CaptureError> {
            self.timeslices.lock().unwrap().push(timeslice);
            let (tx, rx) = mpsc::unbounded_channel();
            for chunk in &self.chunks {
                let _ = tx.send(SinkEvent::Data(chunk.clone()));
            }
            if let Some(message) = &self.failure {
                let _ = tx.send(SinkEvent::Failed(message.clone()));
            }
            self.tx = Some(tx);
            Ok(rx)
        }

        async fn stop_sink(&mut self) -> Result<(), CaptureError> {
            let tx = self.tx.take().ok_or(CaptureError::NotRecording)?;
            if !self.finalizes {
                // Ignores the stop request and keeps the channel open
                self._held = Some(tx);
                return Ok(());
            }
            let late = std::mem::take(&mut self.late);
            // Deliver the tail after the stop call has returned
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                for chunk in late {
                    let _ = tx.send(SinkEvent::Data(chunk));
                }
                let _ = tx.send(SinkEvent::Finalized);
            });
            Ok(())
        }

        async fn stop_tracks(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ScriptedDevice {
        chunks: Vec<Vec<u8>>,
        late: Vec<Vec<u8>>,
        failure: Option<String>,
        finalizes: bool,
        stops: Arc<AtomicUsize>,
        timeslices: Arc<Mutex<Vec<StdDuration>>>,
    }

    impl ScriptedDevice {
        fn new(chunks: Vec<Vec<u8>>, late: Vec<Vec<u8>>) -> Self {
            Self {
                chunks,
                late,
                failure: None,
                finalizes: true,
                stops: Arc::new(AtomicUsize::new(0)),
                timeslices: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl CaptureDevice for ScriptedDevice {
        type Stream = ScriptedStream;

        async fn open(&self, _constraints: &CaptureConstraints) -> Result<ScriptedStream, CaptureError> {
            Ok(ScriptedStream {
                chunks: self.chunks.clone(),
                late: self.late.clone(),
                failure: self.failure.clone(),
                finalizes: self.finalizes,
                tx: None,
                _held: None,
                stops: Arc::clone(&self.stops),
                timeslices: Arc::clone(&self.timeslices),
            })
        }
    }

    #[tokio::test]
    async fn artifact_includes_chunks_arriving_after_stop() {
        let manager = CaptureManager::new(ScriptedDevice::new(
            vec![vec![1, 2], vec![3]],
            vec![vec![4, 5]],
        ));
        let mut handle = manager.acquire().await.unwrap();
        manager.begin_recording(&mut handle).await.unwrap();
        assert_eq!(handle.chunk_count(), 2);

        let artifact = manager.end_recording(&mut handle).await.unwrap();
        assert_eq!(artifact.data(), &[1, 2, 3, 4, 5]);
        assert_eq!(artifact.container(), VideoContainer::Mp4);
        assert!(!handle.is_recording());
    }

    #[tokio::test]
    async fn zero_chunks_is_empty_capture() {
        let manager = CaptureManager::new(ScriptedDevice::new(vec![], vec![]));
        let mut handle = manager.acquire().await.unwrap();
        manager.begin_recording(&mut handle).await.unwrap();

        let err = manager.end_recording(&mut handle).await.unwrap_err();
        assert_eq!(err, CaptureError::EmptyCapture);
    }

    #[tokio::test]
    async fn empty_chunks_do_not_count() {
        let manager = CaptureManager::new(ScriptedDevice::new(vec![vec![], vec![]], vec![vec![]]));
        let mut handle = manager.acquire().await.unwrap();
        manager.begin_recording(&mut handle).await.unwrap();

        assert_eq!(
            manager.end_recording(&mut handle).await.unwrap_err(),
            CaptureError::EmptyCapture
        );
    }

    #[tokio::test]
    async fn release_twice_is_noop() {
        let device = ScriptedDevice::new(vec![vec![1]], vec![]);
        let stops = Arc::clone(&device.stops);
        let manager = CaptureManager::new(device);
        let mut handle = manager.acquire().await.unwrap();

        assert!(manager.release(&mut handle).await);
        assert!(!manager.release(&mut handle).await);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert!(!handle.is_open());
    }

    #[tokio::test]
    async fn cannot_record_on_released_stream() {
        let manager = CaptureManager::new(ScriptedDevice::new(vec![vec![1]], vec![]));
        let mut handle = manager.acquire().await.unwrap();
        manager.release(&mut handle).await;

        assert_eq!(
            manager.begin_recording(&mut handle).await.unwrap_err(),
            CaptureError::StreamClosed
        );
    }

    #[tokio::test]
    async fn cannot_start_twice_or_stop_without_start() {
        let manager = CaptureManager::new(ScriptedDevice::new(vec![vec![1]], vec![]));
        let mut handle = manager.acquire().await.unwrap();

        assert_eq!(
            manager.end_recording(&mut handle).await.unwrap_err(),
            CaptureError::NotRecording
        );

        manager.begin_recording(&mut handle).await.unwrap();
        assert_eq!(
            manager.begin_recording(&mut handle).await.unwrap_err(),
            CaptureError::AlreadyRecording
        );
    }

    #[tokio::test]
    async fn new_recording_starts_with_empty_buffer() {
        let manager = CaptureManager::new(ScriptedDevice::new(vec![vec![7]], vec![]));
        let mut handle = manager.acquire().await.unwrap();

        manager.begin_recording(&mut handle).await.unwrap();
        manager.end_recording(&mut handle).await.unwrap();

        manager.begin_recording(&mut handle).await.unwrap();
        let artifact = manager.end_recording(&mut handle).await.unwrap();
        assert_eq!(artifact.data(), &[7]);
    }

    #[tokio::test]
    async fn sink_runs_with_one_second_slices() {
        let device = ScriptedDevice::new(vec![vec![1]], vec![]);
        let timeslices = Arc::clone(&device.timeslices);
        let manager = CaptureManager::new(device);
        let mut handle = manager.acquire().await.unwrap();

        manager.begin_recording(&mut handle).await.unwrap();

        assert_eq!(CHUNK_TIMESLICE, StdDuration::from_secs(1));
        assert_eq!(*timeslices.lock().unwrap(), vec![StdDuration::from_secs(1)]);
    }

    #[tokio::test]
    async fn sink_failure_reason_replaces_empty_capture() {
        let mut device = ScriptedDevice::new(vec![], vec![]);
        device.failure = Some("Device or resource busy".into());
        let manager = CaptureManager::new(device);
        let mut handle = manager.acquire().await.unwrap();
        manager.begin_recording(&mut handle).await.unwrap();

        assert_eq!(
            manager.end_recording(&mut handle).await.unwrap_err(),
            CaptureError::RecordingFailed("Device or resource busy".into())
        );
    }

    #[tokio::test]
    async fn partial_data_survives_sink_failure() {
        let mut device = ScriptedDevice::new(vec![vec![1, 2]], vec![]);
        device.failure = Some("broken pipe".into());
        let manager = CaptureManager::new(device);
        let mut handle = manager.acquire().await.unwrap();
        manager.begin_recording(&mut handle).await.unwrap();

        let artifact = manager.end_recording(&mut handle).await.unwrap();
        assert_eq!(artifact.data(), &[1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn unresponsive_sink_is_abandoned_after_grace_period() {
        let mut device = ScriptedDevice::new(vec![vec![9, 9]], vec![vec![1]]);
        device.finalizes = false;
        let stops = Arc::clone(&device.stops);
        let manager = CaptureManager::new(device);
        let mut handle = manager.acquire().await.unwrap();
        manager.begin_recording(&mut handle).await.unwrap();

        let started = tokio::time::Instant::now();
        let artifact = manager.end_recording(&mut handle).await.unwrap();

        let waited = started.elapsed();
        assert!(waited >= FINALIZE_GRACE && waited < FINALIZE_GRACE * 2, "{waited:?}");
        assert_eq!(artifact.data(), &[9, 9]);

        // Release still reaches the device so the process gets killed
        assert!(manager.release(&mut handle).await);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
