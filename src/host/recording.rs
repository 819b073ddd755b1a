use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ExecOutput, HostBridge, HostError, Result};

/// Test bridge that records every call and replays scripted responses
#[derive(Default)]
pub struct RecordingHost {
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
    pub opened: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<Result<ExecOutput>>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, output: ExecOutput) -> Self {
        self.responses.lock().unwrap().push_back(Ok(output));
        self
    }

    pub fn fail_spawn(self, program: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(HostError::Spawn {
            program: program.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl HostBridge for RecordingHost {
    fn exec(&self, program: &str, args: &[String]) -> Result<ExecOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecOutput::success("")))
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
