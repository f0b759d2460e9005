//! Store backend subprocess protocol.
//!
//! This module handles communication with external store backend
//! binaries (e.g., `royale-store-file`) using JSON over stdin/stdout.
//!
//! The protocol is language-agnostic: any executable that speaks the
//! JSON protocol can serve the document collection, including wrappers
//! around hosted stores. Backends manage their own credentials.

use serde::Serialize;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{RoyaleError, RoyaleResult};
use crate::store::DocumentStore;
use crate::store::protocol::{Command, Delete, Insert, ListAll, Request, Response, StoreCommand};

const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// A named store backend, resolved to a `royale-store-<name>` binary.
#[derive(Clone, Debug)]
pub struct StoreProvider(String);

impl StoreProvider {
    pub fn from_name(name: &str) -> Self {
        StoreProvider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn binary_path(&self) -> RoyaleResult<std::path::PathBuf> {
        let binary_name = format!("royale-store-{}", self.0);
        let binary_path = which::which(&binary_name).map_err(|_| {
            RoyaleError::StoreNotInstalled(format!(
                "{}. Install it with:\n  cargo install {}",
                self.0, binary_name
            ))
        })?;
        Ok(binary_path)
    }

    /// Call a typed store command and return the result.
    ///
    /// The response type is inferred from the command's associated type,
    /// ensuring compile-time type safety.
    pub async fn call<C: StoreCommand>(&self, cmd: C) -> RoyaleResult<C::Response> {
        timeout(STORE_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| RoyaleError::StoreTimeout(STORE_TIMEOUT.as_secs()))?
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> RoyaleResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| RoyaleError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| RoyaleError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                RoyaleError::Store(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        // Write request to stdin (unwrap safe: we piped stdin above)
        let mut stdin = child.stdin.take().unwrap();
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        // Wait for process and collect output
        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(RoyaleError::Store(format!(
                "Store backend exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.is_empty() {
            return Err(RoyaleError::Store(
                "Store backend returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| RoyaleError::Store(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(RoyaleError::Store(error)),
        }
    }
}

/// [`DocumentStore`] implementation backed by a subprocess provider.
#[derive(Clone, Debug)]
pub struct ProviderStore {
    provider: StoreProvider,
}

impl ProviderStore {
    pub fn new(backend_name: &str) -> Self {
        ProviderStore {
            provider: StoreProvider::from_name(backend_name),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.provider.name()
    }
}

impl DocumentStore for ProviderStore {
    async fn list_all(&self, collection: &str) -> RoyaleResult<Vec<String>> {
        self.provider
            .call(ListAll {
                collection: collection.to_string(),
            })
            .await
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> RoyaleResult<()> {
        self.provider
            .call(Delete {
                collection: collection.to_string(),
                doc_id: doc_id.to_string(),
            })
            .await
    }

    async fn insert(&self, collection: &str, record: serde_json::Value) -> RoyaleResult<String> {
        self.provider
            .call(Insert {
                collection: collection.to_string(),
                record,
            })
            .await
    }
}
