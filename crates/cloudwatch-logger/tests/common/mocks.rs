// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock log-stream client for exercising the pipeline end to end

use async_trait::async_trait;
use cloudwatch_logger::client::{
    CreateLogGroupRequest, CreateLogStreamRequest, LogStreamClient, PutLogEventsRequest,
    PutLogEventsResponse,
};
use cloudwatch_logger::ClientError;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    PutLogEvents(PutLogEventsRequest),
    CreateLogStream(CreateLogStreamRequest),
    CreateLogGroup(CreateLogGroupRequest),
}

/// Records every call and answers from scripted replies. Once a reply queue
/// is empty, calls succeed and appends hand out `token-1`, `token-2`, ...
#[derive(Default)]
pub struct MockLogStreamClient {
    calls: Mutex<Vec<ClientCall>>,
    put_replies: Mutex<VecDeque<Result<(), ClientError>>>,
    stream_replies: Mutex<VecDeque<Result<(), ClientError>>>,
    group_replies: Mutex<VecDeque<Result<(), ClientError>>>,
    issued_tokens: Mutex<u64>,
    put_delay: Option<Duration>,
}

#[allow(dead_code)]
impl MockLogStreamClient {
    pub fn with_put_delay(put_delay: Duration) -> Self {
        Self {
            put_delay: Some(put_delay),
            ..Self::default()
        }
    }

    pub fn fail_next_put(&self, error: ClientError) {
        self.put_replies.lock().unwrap().push_back(Err(error));
    }

    pub fn fail_next_create_stream(&self, error: ClientError) {
        self.stream_replies.lock().unwrap().push_back(Err(error));
    }

    pub fn fail_next_create_group(&self, error: ClientError) {
        self.group_replies.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn puts(&self) -> Vec<PutLogEventsRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ClientCall::PutLogEvents(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn stream_creations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ClientCall::CreateLogStream(_)))
            .count()
    }

    pub fn group_creations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ClientCall::CreateLogGroup(_)))
            .count()
    }
}

#[async_trait]
impl LogStreamClient for MockLogStreamClient {
    async fn put_log_events(
        &self,
        request: PutLogEventsRequest,
    ) -> Result<PutLogEventsResponse, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(ClientCall::PutLogEvents(request));

        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.put_replies.lock().unwrap().pop_front();
        match reply {
            Some(Err(e)) => Err(e),
            _ => {
                let mut issued = self.issued_tokens.lock().unwrap();
                *issued += 1;
                Ok(PutLogEventsResponse {
                    next_sequence_token: Some(format!("token-{}", *issued)),
                })
            }
        }
    }

    async fn create_log_stream(&self, request: CreateLogStreamRequest) -> Result<(), ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(ClientCall::CreateLogStream(request));
        self.stream_replies.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn create_log_group(&self, request: CreateLogGroupRequest) -> Result<(), ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(ClientCall::CreateLogGroup(request));
        self.group_replies.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
