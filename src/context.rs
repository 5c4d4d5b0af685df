use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle, Thread};

use crate::thread as os_thread;

/// A unit of deferred work executed by an execution context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

enum Event {
    Task(Task),
    Shutdown,
}

/// An execution context: a worker thread servicing a FIFO task queue.
///
/// Components record the context they were constructed for as their owning
/// context. Deferred destructions (and any other posted tasks) run on this
/// context's worker thread in posting order.
///
/// Dropping the context sends a shutdown event and joins the worker. Tasks
/// queued before the drop are drained first, so a pending destruction still
/// runs before the context disappears.
pub struct Context {
    tx: Sender<Event>,
    thread: Option<JoinHandle<()>>,
    os_id: usize,
    id: usize,
}

impl Context {
    pub fn new() -> Context {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = thread::spawn(move || Context::run(rx, ready_tx));

        // The worker reports its OS thread id before servicing the queue.
        let os_id = ready_rx.recv().expect("context thread failed to start");

        Context {
            tx,
            thread: Some(thread),
            os_id,
            id,
        }
    }

    fn run(rx: Receiver<Event>, ready_tx: Sender<usize>) {
        drop(ready_tx.send(os_thread::current_id()));

        for event in rx {
            match event {
                Event::Task(task) => task(),
                Event::Shutdown => break,
            }
        }
    }

    /// Returns a clonable handle for posting tasks to this context.
    pub fn handle(&self) -> ContextHandle {
        ContextHandle {
            tx: self.tx.clone(),
            id: self.id,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// The OS thread id of the worker, as reported by `thread::current_id`.
    pub fn os_thread_id(&self) -> usize {
        self.os_id
    }

    /// The worker thread servicing this context's queue.
    pub fn thread(&self) -> &Thread {
        self.thread
            .as_ref()
            .expect("context thread is present until drop")
            .thread()
    }
}

impl Default for Context {
    fn default() -> Context {
        Context::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Err(..) = self.tx.send(Event::Shutdown) {
            // Ignore, but the thread should join anyway.
        }
        self.thread.take().unwrap().join().unwrap();
    }
}

/// A cheap clonable reference to an execution context's task queue.
///
/// A handle does not keep the context alive. Posting to a context that has
/// already shut down leaks the task instead of running it: anything the task
/// owns must never be dropped on the posting thread.
#[derive(Clone)]
pub struct ContextHandle {
    tx: Sender<Event>,
    id: usize,
}

impl ContextHandle {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Posts a task to the context's queue. Never blocks.
    pub fn post(&self, task: Task) {
        if let Err(rejected) = self.tx.send(Event::Task(task)) {
            // The context is gone. Dropping the rejected event would run the
            // task's captures' destructors right here, on the wrong thread.
            mem::forget(rejected);
        }
    }
}
