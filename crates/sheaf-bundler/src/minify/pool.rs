use super::protocol::{WorkerRequest, WorkerResponse};
use super::{BundleRequest, MinifyExecutor, inline};
use crate::enumerate::ModuleJob;
use crate::{Error, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How to launch a minify worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Re-run the current executable as `<exe> minify-worker`.
    pub fn current_exe() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, ["minify-worker"]))
    }
}

/// Default worker limit: one fewer than the number of CPUs.
pub fn default_max_workers() -> usize {
    num_cpus::get().saturating_sub(1)
}

/// A lazily grown pool of minify worker processes.
///
/// Work goes to a worker while fewer than `max_workers` are busy; beyond that
/// it runs in-process. Idle workers are reused. A worker that fails a request
/// (or dies) is killed and never reused. Every live child process is tracked,
/// so [`kill_all`](MinifyExecutor::kill_all) reaches busy workers as well as
/// idle ones.
#[derive(Debug)]
pub struct WorkerPool {
    command: WorkerCommand,
    max_workers: usize,
    idle: Mutex<Vec<Worker>>,
    /// Child handles of every live worker, busy or idle, keyed by worker id.
    children: Mutex<FxHashMap<u64, Child>>,
    next_id: AtomicU64,
    busy: AtomicUsize,
    spawned: AtomicUsize,
    /// Bumped by `kill_all`. Busy workers watch it and abandon their request;
    /// workers from an older generation are never reused.
    generation: watch::Sender<u64>,
}

impl WorkerPool {
    pub fn new(command: WorkerCommand) -> Self {
        Self::with_max_workers(command, default_max_workers())
    }

    pub fn with_max_workers(command: WorkerCommand, max_workers: usize) -> Self {
        Self {
            command,
            max_workers,
            idle: Mutex::new(Vec::new()),
            children: Mutex::new(FxHashMap::default()),
            next_id: AtomicU64::new(0),
            busy: AtomicUsize::new(0),
            spawned: AtomicUsize::new(0),
            generation: watch::Sender::new(0),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Number of worker processes started so far.
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    /// Number of live workers waiting for work.
    pub fn idle_workers(&self) -> usize {
        self.idle.lock().len()
    }

    /// Number of worker processes not yet killed, busy or idle.
    pub fn live_workers(&self) -> usize {
        self.children.lock().len()
    }

    fn try_acquire(&self) -> Option<BusySlot<'_>> {
        self.busy
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |busy| {
                (busy < self.max_workers).then_some(busy + 1)
            })
            .ok()
            .map(|_| BusySlot(&self.busy))
    }

    fn checkout(&self) -> Result<Worker> {
        let reused = self.idle.lock().pop();
        match reused {
            Some(worker) => Ok(worker),
            None => self.spawn(),
        }
    }

    fn spawn(&self) -> Result<Worker> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Worker(format!(
                    "failed to start {}: {}",
                    self.command.program.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Worker("worker stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Worker("worker stdout not captured".to_string()))?;

        let count = self.spawned.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(pid = ?child.id(), spawned = count, "Started minify worker");

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.children.lock().insert(id, child);

        let stopped = self.generation.subscribe();
        let generation = *stopped.borrow();
        Ok(Worker {
            id,
            generation,
            stopped,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn current_generation(&self) -> u64 {
        *self.generation.borrow()
    }

    fn kill(&self, worker: Worker) {
        if let Some(mut child) = self.children.lock().remove(&worker.id) {
            kill_child(&mut child);
        }
    }

    fn release(&self, worker: Worker) {
        if worker.generation == self.current_generation() {
            self.idle.lock().push(worker);
        } else {
            self.kill(worker);
        }
    }

    async fn run(&self, request: WorkerRequest) -> Result<()> {
        let Some(_slot) = self.try_acquire() else {
            debug!(request = %request.describe(), "All workers busy, running in-process");
            return tokio::task::spawn_blocking(move || inline::execute(&request))
                .await
                .map_err(Error::from_join)?;
        };

        let mut worker = self.checkout()?;
        match worker.call(&request).await {
            Ok(WorkerResponse::Done) => {
                self.release(worker);
                Ok(())
            }
            Ok(WorkerResponse::Failed { message }) => {
                self.kill(worker);
                Err(Error::Worker(message))
            }
            Err(e) => {
                if worker.generation == self.current_generation() {
                    warn!(error = %e, "Minify worker died");
                }
                self.kill(worker);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MinifyExecutor for WorkerPool {
    async fn minify_batch(&self, jobs: Vec<ModuleJob>) -> Result<()> {
        if jobs.is_empty() {
            return Ok(());
        }

        let chunks = self.max_workers.clamp(1, jobs.len());
        let chunk_size = jobs.len().div_ceil(chunks);
        debug!(jobs = jobs.len(), chunk_size, "Distributing minify batch");

        try_join_all(
            jobs.chunks(chunk_size)
                .map(|chunk| self.run(WorkerRequest::MinifyBatch { jobs: chunk.to_vec() })),
        )
        .await?;
        Ok(())
    }

    async fn bundle(&self, request: BundleRequest) -> Result<()> {
        self.run(WorkerRequest::Bundle { request }).await
    }

    fn kill_all(&self) {
        self.generation.send_modify(|generation| *generation += 1);
        self.idle.lock().clear();

        let children: Vec<Child> = self.children.lock().drain().map(|(_, child)| child).collect();
        if !children.is_empty() {
            info!(workers = children.len(), "Stopping minify workers");
        }
        for mut child in children {
            kill_child(&mut child);
        }
    }

    fn name(&self) -> &'static str {
        "worker-pool"
    }
}

fn kill_child(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!(error = %e, "Worker already gone");
    }
}

/// Decrements the busy count when dropped.
struct BusySlot<'a>(&'a AtomicUsize);

impl Drop for BusySlot<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The pipes of one worker. Its `Child` lives in the pool's registry.
#[derive(Debug)]
struct Worker {
    id: u64,
    generation: u64,
    stopped: watch::Receiver<u64>,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Worker {
    async fn call(&mut self, request: &WorkerRequest) -> Result<WorkerResponse> {
        let Worker {
            stopped,
            stdin,
            stdout,
            ..
        } = self;

        tokio::select! {
            response = exchange(stdin, stdout, request) => response,
            _ = stopped.changed() => Err(Error::Worker("minify worker was stopped".to_string())),
        }
    }
}

async fn exchange(
    stdin: &mut ChildStdin,
    stdout: &mut BufReader<ChildStdout>,
    request: &WorkerRequest,
) -> Result<WorkerResponse> {
    let mut line = serde_json::to_string(request)
        .map_err(|e| Error::Worker(format!("cannot encode request: {}", e)))?;
    line.push('\n');

    stdin
        .write_all(line.as_bytes())
        .await
        .map_err(|e| Error::Worker(format!("cannot send request: {}", e)))?;
    stdin
        .flush()
        .await
        .map_err(|e| Error::Worker(format!("cannot send request: {}", e)))?;

    let mut reply = String::new();
    let read = stdout
        .read_line(&mut reply)
        .await
        .map_err(|e| Error::Worker(format!("cannot read response: {}", e)))?;
    if read == 0 {
        return Err(Error::Worker("worker exited unexpectedly".to_string()));
    }

    serde_json::from_str(reply.trim())
        .map_err(|e| Error::Worker(format!("invalid response {:?}: {}", reply.trim(), e)))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn shell(script: &str) -> WorkerCommand {
        WorkerCommand::new("/bin/sh", ["-c", script])
    }

    fn jobs(temp: &TempDir, count: usize) -> Vec<ModuleJob> {
        named_jobs(temp, "m", count)
    }

    fn named_jobs(temp: &TempDir, prefix: &str, count: usize) -> Vec<ModuleJob> {
        (0..count)
            .map(|i| {
                let name = format!("{}{}", prefix, i);
                let source = temp.path().join(format!("{}.js", name));
                fs::write(&source, format!("window.{} = {};", name, i)).unwrap();
                ModuleJob {
                    source_path: source,
                    destination_path: temp.path().join(format!("{}.out.js", name)),
                    relative_name: format!("{}.js", name),
                }
            })
            .collect()
    }

    async fn wait_for_pid(path: &Path) -> u32 {
        for _ in 0..500 {
            if let Some(pid) = fs::read_to_string(path)
                .ok()
                .and_then(|s| s.trim().parse().ok())
            {
                return pid;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("worker never wrote {}", path.display());
    }

    /// True once `pid` is gone or a zombie.
    #[cfg(target_os = "linux")]
    async fn wait_for_exit(pid: u32) -> bool {
        for _ in 0..500 {
            match fs::read_to_string(format!("/proc/{}/status", pid)) {
                Err(_) => return true,
                Ok(status) => {
                    let state = status.lines().find(|line| line.starts_with("State:"));
                    if state.is_some_and(|line| line.contains('Z')) {
                        return true;
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    const ECHO_DONE: &str = r#"while read line; do echo '{"status":"done"}'; done"#;

    #[tokio::test]
    async fn test_workers_are_reused() {
        let temp = TempDir::new().unwrap();
        let pool = WorkerPool::with_max_workers(shell(ECHO_DONE), 2);

        pool.minify_batch(jobs(&temp, 5)).await.unwrap();
        assert_eq!(pool.spawned(), 2);
        assert_eq!(pool.idle_workers(), 2);

        pool.minify_batch(jobs(&temp, 2)).await.unwrap();
        assert_eq!(pool.spawned(), 2, "idle workers should be reused");

        pool.kill_all();
        assert_eq!(pool.idle_workers(), 0);
        assert_eq!(pool.live_workers(), 0);
        pool.kill_all();
    }

    #[tokio::test]
    async fn test_kill_all_stops_busy_worker() {
        let temp = TempDir::new().unwrap();
        let pid_file = temp.path().join("worker.pid");
        let script = format!("echo $$ > '{}'; read line; exec sleep 30", pid_file.display());
        let pool = Arc::new(WorkerPool::with_max_workers(shell(&script), 1));

        let batch = tokio::spawn({
            let pool = Arc::clone(&pool);
            let jobs = jobs(&temp, 1);
            async move { pool.minify_batch(jobs).await }
        });

        let pid = wait_for_pid(&pid_file).await;
        assert_eq!(pool.live_workers(), 1);
        assert_eq!(pool.idle_workers(), 0);

        pool.kill_all();
        assert_eq!(pool.live_workers(), 0);

        let result = tokio::time::timeout(Duration::from_secs(5), batch)
            .await
            .expect("batch kept waiting on a killed worker")
            .unwrap();
        assert!(matches!(result, Err(Error::Worker(ref m)) if m.contains("stopped")));

        #[cfg(target_os = "linux")]
        assert!(wait_for_exit(pid).await, "worker {} survived kill_all", pid);
        #[cfg(not(target_os = "linux"))]
        let _ = pid;
    }

    #[tokio::test]
    async fn test_busy_pool_overflows_in_process() {
        let temp = TempDir::new().unwrap();
        let pool = WorkerPool::with_max_workers(shell(ECHO_DONE), 1);
        let to_worker = named_jobs(&temp, "w", 2);
        let overflow = named_jobs(&temp, "o", 2);

        let (first, second) = tokio::join!(
            pool.minify_batch(to_worker.clone()),
            pool.minify_batch(overflow.clone()),
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(pool.spawned(), 1);
        assert_eq!(pool.idle_workers(), 1);
        // The scripted worker only acknowledges; files come from the in-process run
        for job in &overflow {
            assert!(job.destination_path.exists(), "{} missing", job.relative_name);
        }
        for job in &to_worker {
            assert!(!job.destination_path.exists());
        }
        pool.kill_all();
    }

    #[tokio::test]
    async fn test_failed_response_kills_worker() {
        let temp = TempDir::new().unwrap();
        let pool = WorkerPool::with_max_workers(
            shell(r#"read line; echo '{"status":"failed","message":"Error minifying m0.js: bad"}'"#),
            1,
        );

        let err = pool.minify_batch(jobs(&temp, 1)).await.unwrap_err();
        assert!(matches!(err, Error::Worker(ref m) if m.contains("m0.js")));
        assert_eq!(pool.idle_workers(), 0);
    }

    #[tokio::test]
    async fn test_dead_worker_is_an_error() {
        let temp = TempDir::new().unwrap();
        let pool = WorkerPool::with_max_workers(shell("exit 3"), 1);

        let err = pool.minify_batch(jobs(&temp, 1)).await.unwrap_err();
        assert!(matches!(err, Error::Worker(_)));
        assert_eq!(pool.idle_workers(), 0);
    }

    #[tokio::test]
    async fn test_zero_workers_runs_in_process() {
        let temp = TempDir::new().unwrap();
        let pool = WorkerPool::with_max_workers(shell("exit 1"), 0);
        let batch = jobs(&temp, 3);

        pool.minify_batch(batch.clone()).await.unwrap();
        assert_eq!(pool.spawned(), 0);
        for job in &batch {
            assert!(job.destination_path.exists());
        }
    }

    #[tokio::test]
    async fn test_unknown_program_fails_to_spawn() {
        let temp = TempDir::new().unwrap();
        let pool = WorkerPool::with_max_workers(
            WorkerCommand::new(temp.path().join("no-such-binary"), Vec::<String>::new()),
            1,
        );
        let err = pool.minify_batch(jobs(&temp, 1)).await.unwrap_err();
        assert!(matches!(err, Error::Worker(ref m) if m.contains("failed to start")));
    }
}
