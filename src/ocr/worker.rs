//! OCRワーカー
//!
//! - 初期化は起動時に一度だけ、ブロッキングスレッドで実行
//! - 初期化が終わるまでの投入は `OcrNotReady` で拒否
//! - 同時に処理するのは1件のみ。処理中の投入は `OcrBusy` で拒否（待ち行列なし）
//! - 実行中のOCRは中断しない。呼び出し側はタイムアウトで待つのをやめるだけ

use super::{extract_candidates, OcrService, RasterImage};
use crate::error::{OcrError, Result, SelaError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

/// ワーカーの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState {
    Initializing,
    Ready,
    /// 初期化の失敗（`submit` はこのエラーをそのまま返す）
    Failed(OcrError),
}

struct Job {
    image: RasterImage,
    reply: oneshot::Sender<std::result::Result<Vec<String>, OcrError>>,
}

/// 投入済みのOCRジョブ
pub struct OcrJob {
    reply: oneshot::Receiver<std::result::Result<Vec<String>, OcrError>>,
    timeout: Duration,
}

impl OcrJob {
    /// 結果を待つ（タイムアウトあり）
    pub async fn wait(self) -> Result<Vec<String>> {
        match tokio::time::timeout(self.timeout, self.reply).await {
            Ok(Ok(result)) => Ok(result?),
            Ok(Err(_)) => Err(OcrError::WorkerGone.into()),
            Err(_) => Err(OcrError::Timeout(self.timeout).into()),
        }
    }
}

pub struct OcrWorker {
    state: watch::Receiver<WorkerState>,
    jobs: mpsc::Sender<Job>,
    busy: Arc<AtomicBool>,
    timeout: Duration,
}

impl OcrWorker {
    /// ワーカーを起動（tokioランタイム内で呼ぶこと）
    ///
    /// `init` はOCRエンジンの初期化処理。重いのでブロッキングスレッドで実行する。
    pub fn spawn<S, F>(init: F, timeout: Duration) -> Self
    where
        S: OcrService + 'static,
        F: FnOnce() -> std::result::Result<S, OcrError> + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(WorkerState::Initializing);
        let (job_tx, mut job_rx) = mpsc::channel::<Job>(1);
        let busy = Arc::new(AtomicBool::new(false));
        let worker_busy = Arc::clone(&busy);

        tokio::spawn(async move {
            let service = match tokio::task::spawn_blocking(init).await {
                Ok(Ok(service)) => Arc::new(service),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "ocr initialization failed");
                    state_tx.send_replace(WorkerState::Failed(e));
                    return;
                }
                Err(e) => {
                    tracing::error!(error = %e, "ocr initialization panicked");
                    state_tx.send_replace(WorkerState::Failed(OcrError::Init(e.to_string())));
                    return;
                }
            };
            state_tx.send_replace(WorkerState::Ready);
            tracing::info!("ocr worker ready");

            while let Some(Job { image, reply }) = job_rx.recv().await {
                let service = Arc::clone(&service);
                tracing::debug!(width = image.width(), height = image.height(), "ocr job started");

                let outcome =
                    tokio::task::spawn_blocking(move || extract_candidates(service.as_ref(), &image))
                        .await
                        .unwrap_or_else(|e| Err(OcrError::Recognition(e.to_string())));

                match &outcome {
                    Ok(names) => tracing::info!(candidates = names.len(), "ocr job finished"),
                    Err(e) => tracing::warn!(error = %e, "ocr job failed"),
                }

                // 結果を受け取った呼び出し側がすぐ次を投入できるよう、先にフラグを下ろす
                worker_busy.store(false, Ordering::Release);
                // 呼び出し側がタイムアウト済みなら送信先はない
                let _ = reply.send(outcome);
            }
        });

        Self {
            state: state_rx,
            jobs: job_tx,
            busy,
            timeout,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state.borrow().clone()
    }

    /// 初期化の完了（成功または失敗）を待つ
    pub async fn wait_ready(&self) -> WorkerState {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !matches!(s, WorkerState::Initializing))
            .await
            .map(|current| (*current).clone());
        settled.unwrap_or(WorkerState::Failed(OcrError::WorkerGone))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// 画像を投入
    pub fn submit(&self, image: RasterImage) -> Result<OcrJob> {
        match self.state() {
            WorkerState::Initializing => return Err(SelaError::OcrNotReady),
            WorkerState::Failed(e) => return Err(e.into()),
            WorkerState::Ready => {}
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SelaError::OcrBusy);
        }

        let (reply, receiver) = oneshot::channel();
        if self.jobs.try_send(Job { image, reply }).is_err() {
            self.busy.store(false, Ordering::Release);
            return Err(OcrError::WorkerGone.into());
        }

        Ok(OcrJob {
            reply: receiver,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sela_common::OcrSpan;

    struct SlowOcr {
        delay: Duration,
        text: String,
    }

    impl OcrService for SlowOcr {
        fn recognize(&self, _image: &RasterImage) -> std::result::Result<Vec<OcrSpan>, OcrError> {
            std::thread::sleep(self.delay);
            Ok(vec![OcrSpan::new(self.text.clone(), 90.0)])
        }
    }

    fn slow(delay_ms: u64, text: &str) -> SlowOcr {
        SlowOcr {
            delay: Duration::from_millis(delay_ms),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_rejects_until_initialized() {
        let worker = OcrWorker::spawn(
            || {
                std::thread::sleep(Duration::from_millis(200));
                Ok(slow(0, "[x] alice"))
            },
            Duration::from_secs(5),
        );

        let err = worker.submit(RasterImage::blank(1, 1)).err().unwrap();
        assert!(matches!(err, SelaError::OcrNotReady));

        assert_eq!(worker.wait_ready().await, WorkerState::Ready);
        let names = worker
            .submit(RasterImage::blank(1, 1))
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert_eq!(names, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_rejects_while_busy_then_runs_sequentially() {
        let worker = OcrWorker::spawn(|| Ok(slow(200, "[1] bob99")), Duration::from_secs(5));
        worker.wait_ready().await;

        let first = worker.submit(RasterImage::blank(1, 1)).unwrap();
        assert!(worker.is_busy());
        let err = worker.submit(RasterImage::blank(1, 1)).err().unwrap();
        assert!(matches!(err, SelaError::OcrBusy));

        assert_eq!(first.wait().await.unwrap(), vec!["bob99"]);
        assert!(!worker.is_busy());
        let second = worker.submit(RasterImage::blank(1, 1)).unwrap();
        assert_eq!(second.wait().await.unwrap(), vec!["bob99"]);
    }

    struct InstantOcr;

    impl OcrService for InstantOcr {
        fn recognize(&self, _image: &RasterImage) -> std::result::Result<Vec<OcrSpan>, OcrError> {
            Ok(vec![OcrSpan::new("[1] carol", 90.0)])
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_resubmit_right_after_completion_is_accepted() {
        let worker = OcrWorker::spawn(|| Ok(InstantOcr), Duration::from_secs(5));
        assert_eq!(worker.wait_ready().await, WorkerState::Ready);

        for _ in 0..500 {
            let job = worker
                .submit(RasterImage::blank(1, 1))
                .expect("completed job must free the worker");
            assert_eq!(job.wait().await.unwrap(), vec!["carol"]);
        }
    }

    #[tokio::test]
    async fn test_init_failure_degrades() {
        let worker = OcrWorker::spawn(
            || -> std::result::Result<SlowOcr, OcrError> {
                Err(OcrError::Init("model files missing".into()))
            },
            Duration::from_secs(5),
        );

        let state = worker.wait_ready().await;
        assert_eq!(
            state,
            WorkerState::Failed(OcrError::Init("model files missing".into()))
        );

        let err = worker.submit(RasterImage::blank(1, 1)).err().unwrap();
        assert!(matches!(err, SelaError::Ocr(OcrError::Init(_))));
        // 初期化エラーは二重に包まない
        assert_eq!(err.to_string(), "OCRエンジンの初期化に失敗: model files missing");
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let worker = OcrWorker::spawn(|| Ok(slow(300, "[1] late")), Duration::from_millis(20));
        worker.wait_ready().await;

        let err = worker
            .submit(RasterImage::blank(1, 1))
            .unwrap()
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SelaError::Ocr(OcrError::Timeout(t)) if t == Duration::from_millis(20)
        ));
        // 実行中のジョブは中断されないので、まだ処理中
        assert!(worker.is_busy());
    }
}
