//! Background request engine
//!
//! API calls run on a dedicated thread with its own tokio runtime so the UI
//! loop never blocks on the network. Requests are executed one at a time in
//! the order they were sent. Each produces exactly one [`Outcome`] unless it
//! is cancelled first.

use issuedesk_client::{ClientError, IssueApi, Operation};
use issuedesk_core::{Issue, IssueUpdate, NewIssue};
use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Operations the UI can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Create(NewIssue),
    Update { id: String, payload: IssueUpdate },
    Delete { id: String },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::List => Operation::List,
            Request::Create(_) => Operation::Create,
            Request::Update { .. } => Operation::Update,
            Request::Delete { .. } => Operation::Delete,
        }
    }

    pub fn loading_message(&self) -> &'static str {
        match self {
            Request::List => "Loading issues...",
            Request::Create(_) => "Creating issue...",
            Request::Update { .. } => "Updating issue...",
            Request::Delete { .. } => "Deleting issue...",
        }
    }
}

/// Outcome of a [`Request`]
#[derive(Debug)]
pub enum Event {
    Listed(Result<Vec<Issue>, ClientError>),
    Created(Result<Issue, ClientError>),
    Updated {
        id: String,
        result: Result<Issue, ClientError>,
    },
    Deleted {
        id: String,
        result: Result<(), ClientError>,
    },
}

/// Messages from the UI to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run { generation: u64, request: Request },
    /// Drop the request currently executing; queued requests still run
    Cancel,
}

/// An [`Event`] tagged with the generation of the request that caused it
#[derive(Debug)]
pub struct Outcome {
    pub generation: u64,
    pub event: Event,
}

/// Handle held by the UI. When the last handle is dropped the engine stops.
#[derive(Clone)]
pub struct EngineHandle {
    tx: UnboundedSender<Command>,
}

impl EngineHandle {
    pub fn new(tx: UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    /// Queue a request. Returns false if the engine has shut down.
    pub fn send(&self, generation: u64, request: Request) -> bool {
        self.tx.send(Command::Run { generation, request }).is_ok()
    }

    /// Abandon the request being executed
    pub fn cancel(&self) -> bool {
        self.tx.send(Command::Cancel).is_ok()
    }
}

/// Start the engine thread. Outcomes are delivered on `events`.
pub fn start<A>(api: A, events: Sender<Outcome>) -> std::io::Result<EngineHandle>
where
    A: IssueApi + 'static,
{
    let (tx, rx) = unbounded_channel();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("issuedesk-engine".into())
        .spawn(move || runtime.block_on(run(api, rx, events)))?;

    Ok(EngineHandle::new(tx))
}

async fn run<A: IssueApi>(api: A, mut rx: UnboundedReceiver<Command>, events: Sender<Outcome>) {
    tracing::debug!("engine started");
    let mut queue = VecDeque::new();

    loop {
        let (generation, request) = match queue.pop_front() {
            Some(job) => job,
            None => match rx.recv().await {
                Some(Command::Run { generation, request }) => (generation, request),
                Some(Command::Cancel) => continue,
                None => break,
            },
        };

        let work = execute(&api, request);
        tokio::pin!(work);
        let event = loop {
            tokio::select! {
                event = &mut work => break Some(event),
                command = rx.recv() => match command {
                    Some(Command::Run { generation, request }) => {
                        queue.push_back((generation, request));
                    }
                    Some(Command::Cancel) => {
                        tracing::info!(generation, "request cancelled");
                        break None;
                    }
                    None => {
                        tracing::debug!("engine stopped");
                        return;
                    }
                },
            }
        };

        let Some(event) = event else {
            continue;
        };
        if events.send(Outcome { generation, event }).is_err() {
            break;
        }
    }
    tracing::debug!("engine stopped");
}

/// Run a single request against the API
pub async fn execute<A: IssueApi + ?Sized>(api: &A, request: Request) -> Event {
    match request {
        Request::List => Event::Listed(api.list_issues().await),
        Request::Create(payload) => Event::Created(api.create_issue(&payload).await),
        Request::Update { id, payload } => {
            let result = api.update_issue(&id, &payload).await;
            Event::Updated { id, result }
        }
        Request::Delete { id } => {
            let result = api.delete_issue(&id).await;
            Event::Deleted { id, result }
        }
    }
}
